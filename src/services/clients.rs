//! Client management service

use crate::{
    error::{AppError, AppResult, ErrorCode},
    models::client::{Client, ClientQuery, ClientShort, CreateClient, UpdateClient},
    repository::Repository,
};

#[derive(Clone)]
pub struct ClientsService {
    repository: Repository,
}

impl ClientsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Client> {
        self.repository.clients.get_by_id(id).await
    }

    pub async fn search(&self, query: &ClientQuery) -> AppResult<(Vec<ClientShort>, i64)> {
        self.repository.clients.search(query).await
    }

    pub async fn create(&self, client: CreateClient) -> AppResult<Client> {
        if self.repository.clients.name_exists(&client.name, None).await? {
            return Err(AppError::Conflict(format!(
                "Client '{}' already exists",
                client.name
            )));
        }
        self.repository.clients.create(&client).await
    }

    pub async fn update(&self, id: i32, client: UpdateClient) -> AppResult<Client> {
        self.repository.clients.get_by_id(id).await?;

        if let Some(ref name) = client.name {
            if self.repository.clients.name_exists(name, Some(id)).await? {
                return Err(AppError::Conflict(format!("Client '{}' already exists", name)));
            }
        }

        self.repository.clients.update(id, &client).await
    }

    /// Delete a client. Refused while employees reference it.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.clients.get_by_id(id).await?;

        let employees = self.repository.employees.count_for_client(id).await?;
        if employees > 0 {
            return Err(AppError::BusinessRule(
                ErrorCode::ClientHasEmployees,
                format!("Client has {} employee(s) attached", employees),
            ));
        }

        self.repository.clients.delete(id).await
    }
}
