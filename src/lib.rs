use std::sync::OnceLock;

use dashmap::DashMap;

use crate::client::Client;

pub mod adapter;
pub mod cache;
pub mod client;
pub mod config;
pub mod contact;
pub mod error;
pub mod event;
pub mod media;
pub mod message;
pub mod protocol;
pub mod service;

pub struct RedGlobalStatus {
    clients: DashMap<String, Client>,
}

static RED_GLOBAL_STATUS: OnceLock<RedGlobalStatus> = OnceLock::new();

pub fn global_status() -> &'static RedGlobalStatus {
    RED_GLOBAL_STATUS.get_or_init(RedGlobalStatus::new)
}

impl RedGlobalStatus {
    pub fn new() -> Self {
        Self {
            clients: DashMap::new(),
        }
    }

    pub fn clients(&self) -> Vec<Client> {
        self.clients.iter().map(|c| c.clone()).collect()
    }

    pub fn add_client(&self, client: Client) -> Option<Client> {
        self.clients.insert(client.id().to_owned(), client)
    }

    pub fn remove_client(&self, id: &str) -> Option<Client> {
        self.clients.remove(id).map(|(_, client)| client)
    }
}

impl Default for RedGlobalStatus {
    fn default() -> Self {
        Self::new()
    }
}
