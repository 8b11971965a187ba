//! Action handlers: one short sequential flow per user action.
//!
//! Every handler follows the same shape: validate locally, call the API,
//! update the session state, report the outcome. Failures never kill the
//! session; each flow degrades into its own placeholder.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::api::{ApiClient, ApiError};
use crate::state::AppState;
use crate::types::{NewActivity, NewChild, NewGoal};

/// Failure of a user-initiated flow.
#[derive(Debug, Error)]
pub enum ActionError {
    /// A required field is missing or the action is not applicable; nothing
    /// was sent to the backend.
    #[error("{0}")]
    Invalid(String),

    /// The API call failed. The message is the alert shown to the user.
    #[error("Erro na comunicação com a API: {0}")]
    Api(#[from] ApiError),

    /// The report bytes arrived but could not be written to disk.
    #[error("Erro ao salvar o relatório: {0}")]
    Io(#[from] std::io::Error),
}

fn invalid(message: &str) -> ActionError {
    ActionError::Invalid(message.to_string())
}

/// Owns the API client and the session state, and runs the user flows.
pub struct Controller {
    api: ApiClient,
    state: AppState,
}

impl Controller {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            state: AppState::new(),
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut AppState {
        &mut self.state
    }

    /// Load the reference data (children and subjects) concurrently. Either
    /// failure leaves the caches untouched and fails the whole load.
    pub async fn bootstrap(&mut self) -> Result<(), ApiError> {
        let (children, subjects) =
            tokio::join!(self.api.list_children(), self.api.list_subjects());
        let children = children?;
        let subjects = subjects?;

        info!(
            children = children.len(),
            subjects = subjects.len(),
            "dados iniciais carregados"
        );
        self.state.set_children(children);
        self.state.set_subjects(subjects);
        Ok(())
    }

    /// Register a child, cache it, and select it so its (empty) panels load.
    pub async fn add_child(
        &mut self,
        name: &str,
        birth_date: Option<&str>,
    ) -> Result<(), ActionError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(invalid("Por favor, informe o nome da criança."));
        }

        let payload = NewChild {
            name: name.to_string(),
            birth_date: birth_date
                .map(str::trim)
                .filter(|d| !d.is_empty())
                .map(String::from),
        };
        let created = self.api.add_child(&payload).await?;
        info!(id = %created.id, name = %created.name, "criança cadastrada");

        let id = created.id.clone();
        self.state.insert_child(created);
        self.select_child(&id).await
    }

    /// Select a child and fetch its goals and activities concurrently. The
    /// two fetches land in independent panels: one failing does not blank
    /// the other. Any failure is still reported so the shell can alert.
    pub async fn select_child(&mut self, id: &str) -> Result<(), ActionError> {
        if !self.state.select_child(id) {
            return Err(invalid("Criança não encontrada."));
        }

        let (goals, activities) =
            tokio::join!(self.api.list_goals(id), self.api.list_activities(id));

        let mut first_error = None;
        match goals {
            Ok(goals) => self.state.set_goals(goals),
            Err(e) => {
                self.state.fail_goals();
                first_error = Some(e);
            }
        }
        match activities {
            Ok(activities) => self.state.set_activities(activities),
            Err(e) => {
                self.state.fail_activities();
                first_error.get_or_insert(e);
            }
        }

        match first_error {
            Some(e) => Err(e.into()),
            None => Ok(()),
        }
    }

    /// Create a goal, then re-fetch the full list: the server is the source
    /// of truth after a mutation (it fills in defaults such as the status).
    pub async fn add_goal(&mut self, subject_id: &str, description: &str) -> Result<(), ActionError> {
        let child_id = self.require_selection()?;
        let subject_id = subject_id.trim();
        let description = description.trim();
        if subject_id.is_empty() || description.is_empty() {
            return Err(invalid("Por favor, selecione a disciplina e descreva a meta."));
        }

        let payload = NewGoal {
            subject_id: subject_id.to_string(),
            description: description.to_string(),
        };
        self.api.add_goal(&child_id, &payload).await?;

        match self.api.list_goals(&child_id).await {
            Ok(goals) => {
                self.state.set_goals(goals);
                Ok(())
            }
            Err(e) => {
                self.state.fail_goals();
                Err(e.into())
            }
        }
    }

    /// Log an activity; same re-fetch policy as goals.
    pub async fn log_activity(
        &mut self,
        subject_id: &str,
        description: &str,
        observations: Option<&str>,
    ) -> Result<(), ActionError> {
        let child_id = self.require_selection()?;
        let subject_id = subject_id.trim();
        let description = description.trim();
        if subject_id.is_empty() || description.is_empty() {
            return Err(invalid(
                "Por favor, selecione a disciplina e descreva a atividade.",
            ));
        }

        let payload = NewActivity {
            subject_id: subject_id.to_string(),
            description: description.to_string(),
            observations: observations
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from),
        };
        self.api.log_activity(&child_id, &payload).await?;

        match self.api.list_activities(&child_id).await {
            Ok(activities) => {
                self.state.set_activities(activities);
                Ok(())
            }
            Err(e) => {
                self.state.fail_activities();
                Err(e.into())
            }
        }
    }

    /// Generate the PDF report for the selected child and save it under
    /// `output_dir`. The filename comes from the `Content-Disposition`
    /// header, falling back to `relatorio_<name or id>.pdf`. The in-flight
    /// guard is released on every path.
    pub async fn generate_report(&mut self, output_dir: &Path) -> Result<PathBuf, ActionError> {
        let (child_id, child_name) = {
            let child = self
                .state
                .selected_child()
                .ok_or_else(|| invalid("Selecione uma criança primeiro."))?;
            (child.id.clone(), child.name.clone())
        };
        if !self.state.try_begin_report() {
            return Err(invalid("Geração de relatório já em andamento."));
        }

        let result = self
            .fetch_and_save_report(&child_id, &child_name, output_dir)
            .await;
        self.state.end_report();

        match &result {
            Ok(path) => self
                .state
                .set_report_status(format!("Relatório gerado e salvo em {}!", path.display())),
            Err(_) => self.state.set_report_status("Erro ao gerar relatório."),
        }
        result
    }

    async fn fetch_and_save_report(
        &self,
        child_id: &str,
        child_name: &str,
        output_dir: &Path,
    ) -> Result<PathBuf, ActionError> {
        let download = self.api.generate_report(child_id).await?;

        let filename = download.filename.unwrap_or_else(|| {
            let label = if child_name.is_empty() { child_id } else { child_name };
            format!("relatorio_{label}.pdf")
        });

        std::fs::create_dir_all(output_dir)?;
        let path = output_dir.join(filename);
        std::fs::write(&path, &download.bytes)?;

        info!(
            path = %path.display(),
            size = download.bytes.len(),
            "relatório salvo"
        );
        Ok(path)
    }

    /// Request the simulated analysis for the selected child. The result is
    /// ephemeral: it replaces whatever the panel held before.
    pub async fn analyze(&mut self) -> Result<(), ActionError> {
        let child_id = self.require_selection()?;
        if !self.state.try_begin_analysis() {
            return Err(invalid("Análise já em andamento."));
        }

        let result = self.api.analyze(&child_id).await;
        self.state.end_analysis();

        match result {
            Ok(analysis) => {
                self.state.set_analysis(analysis);
                Ok(())
            }
            Err(e) => {
                self.state.fail_analysis();
                Err(e.into())
            }
        }
    }

    fn require_selection(&self) -> Result<String, ActionError> {
        self.state
            .current_child_id()
            .map(String::from)
            .ok_or_else(|| invalid("Selecione uma criança primeiro."))
    }
}
