//! Client table controller.

use crate::model::client::{Client, ClientId, ClientShort, NewClient};
use crate::repo::{ClientListQuery, ClientRepository, RepoError};
use crate::service::client_service::ClientService;
use log::error;

/// Presentation surface for the client table.
pub trait ClientView {
    fn render_clients(&mut self, clients: &[ClientShort]);
    fn warn(&mut self, message: &str);
}

/// Raw text typed into the client form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClientForm {
    pub last_name: String,
    pub first_name: String,
    pub middle_name: String,
    pub address: String,
    pub phone: String,
}

impl ClientForm {
    /// Trims surrounding whitespace; validation happens in the repository.
    pub fn to_new_client(&self) -> NewClient {
        NewClient::new(
            self.last_name.trim(),
            self.first_name.trim(),
            self.middle_name.trim(),
            self.address.trim(),
            self.phone.trim(),
        )
    }
}

/// Drives a `ClientView` through `ClientService`.
pub struct ClientController<V: ClientView, R: ClientRepository> {
    view: V,
    service: ClientService<R>,
}

impl<V: ClientView, R: ClientRepository> ClientController<V, R> {
    /// Creates the controller and renders the initial table.
    pub fn new(view: V, service: ClientService<R>) -> Self {
        let mut controller = Self { view, service };
        controller.refresh();
        controller
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn service(&self) -> &ClientService<R> {
        &self.service
    }

    pub fn refresh(&mut self) {
        match self.service.list(&ClientListQuery::default()) {
            Ok(clients) => {
                let rows: Vec<ClientShort> = clients.iter().map(Client::short).collect();
                self.view.render_clients(&rows);
            }
            Err(err) => self.report("refresh", &err),
        }
    }

    pub fn add_client(&mut self, form: &ClientForm) -> Option<ClientId> {
        match self.service.create_client(&form.to_new_client()) {
            Ok(id) => {
                self.refresh();
                Some(id)
            }
            Err(err) => {
                self.report("add", &err);
                None
            }
        }
    }

    pub fn replace_client(&mut self, selected: Option<ClientId>, form: &ClientForm) -> bool {
        let Some(id) = selected else {
            self.view.warn("select a client to edit");
            return false;
        };
        match self.service.replace_client(id, &form.to_new_client()) {
            Ok(true) => {
                self.refresh();
                true
            }
            Ok(false) => {
                self.view.warn("client not found");
                false
            }
            Err(err) => {
                self.report("replace", &err);
                false
            }
        }
    }

    pub fn delete_client(&mut self, selected: Option<ClientId>) -> bool {
        let Some(id) = selected else {
            self.view.warn("select a client to delete");
            return false;
        };
        match self.service.delete_client(id) {
            Ok(true) => {
                self.refresh();
                true
            }
            Ok(false) => {
                self.view.warn("client not found");
                false
            }
            Err(err) => {
                self.report("delete", &err);
                false
            }
        }
    }

    fn report(&mut self, action: &'static str, err: &RepoError) {
        // Validation failures are user input problems, not faults.
        if !matches!(err, RepoError::ClientValidation(_)) {
            error!("event=client_{action} module=controller status=error error={err}");
        }
        self.view.warn(&err.to_string());
    }
}
