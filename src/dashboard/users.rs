use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::Result;
use crate::error::InputError;
use crate::outcome::Outcome;
use crate::view::{Render, StatusMessage, Tone};
use crate::zbx_client::{CreatedUsers, NewUser, RpcEnvelope};

use super::Dashboard;

/// Registration form. The API token used to create the account belongs to
/// the client configuration, never to the form.
#[derive(Debug, Clone)]
pub struct UserForm {
    pub alias: String,
    pub password: SecretString,
    pub name: String,
    pub surname: String,
    pub group_id: String,
    pub lang: String,
}

impl UserForm {
    /// # Errors
    ///
    /// Fails when alias, password or group id is blank.
    pub fn to_new_user(&self) -> std::result::Result<NewUser, InputError> {
        let alias = self.alias.trim();
        if alias.is_empty() {
            return Err(InputError::Empty { field: "alias" });
        }
        if self.password.expose_secret().is_empty() {
            return Err(InputError::Empty { field: "password" });
        }
        let group_id = self.group_id.trim();
        if group_id.is_empty() {
            return Err(InputError::Empty { field: "user group id" });
        }
        Ok(NewUser {
            alias: alias.to_string(),
            password: self.password.clone(),
            name: self.name.trim().to_string(),
            surname: self.surname.trim().to_string(),
            group_id: group_id.to_string(),
            lang: self.lang.clone(),
        })
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RegistrationView {
    pub status: StatusMessage,
    pub user_ids: Vec<String>,
}

impl RegistrationView {
    pub fn pending() -> Self {
        Self {
            status: StatusMessage::new(
                Tone::Neutral,
                "Enviando solicitud a la API de Zabbix...",
            ),
            user_ids: Vec::new(),
        }
    }

    pub fn from_envelope(envelope: RpcEnvelope<CreatedUsers>) -> Self {
        match Outcome::classify(envelope.map_result(|created| created.userids)) {
            Outcome::ApiError(err) => Self {
                status: StatusMessage::new(Tone::Error, format!("Error de API: {}", err.detail())),
                user_ids: Vec::new(),
            },
            Outcome::Data(ids) => Self {
                status: StatusMessage::new(
                    Tone::Success,
                    format!("Usuario creado con éxito. User ID(s): {}", ids.join(", ")),
                ),
                user_ids: ids,
            },
            Outcome::Empty => Self {
                status: StatusMessage::new(Tone::Warning, "Respuesta inesperada de la API."),
                user_ids: Vec::new(),
            },
        }
    }

    pub fn connection_failed(err: &impl std::fmt::Display) -> Self {
        Self {
            status: StatusMessage::new(Tone::Error, format!("Error de red/conexión: {err}")),
            user_ids: Vec::new(),
        }
    }
}

impl Render for RegistrationView {
    fn status(&self) -> &StatusMessage {
        &self.status
    }

    fn to_text(&self) -> String {
        self.status.to_string()
    }

    fn to_html(&self) -> String {
        format!(
            r#"<div id="resultado">{}</div>"#,
            self.status.to_html()
        )
    }
}

impl Dashboard {
    /// Creates one Zabbix user in the given group.
    ///
    /// # Errors
    ///
    /// Blank required fields, or [`crate::error::Error::Busy`] when another
    /// submission is still running.
    pub async fn register_user(&self, form: &UserForm) -> Result<RegistrationView> {
        let user = form.to_new_user()?;
        let _permit = self.begin("users")?;
        info!(alias = %user.alias, group_id = %user.group_id, "creating user");

        match self.client.create_user(&user).await {
            Ok(envelope) => Ok(RegistrationView::from_envelope(envelope)),
            Err(err) => {
                warn!(error = %err, alias = %user.alias, "user creation failed");
                Ok(RegistrationView::connection_failed(&err))
            }
        }
    }
}
