//! Command handlers.
//!
//! Every invocation is one page load: open the store, restore persisted
//! state, apply the command, save state, render.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard};

use tracing::debug;

use super::commands::{
    AddCommand, ConfigCommand, DeleteCommand, EditCommand, ListCommand, LoginCommand,
    PrefsCommand, ResidentsCommand, StatusCommand,
};
use super::render::{self, Style};
use super::Command;
use crate::api::{Latency, LocalResidentApi};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::resident::{format_timestamp, NewResident, ResidentUpdate};
use crate::state::AppState;
use crate::stats::DashboardStats;
use crate::storage::Storage;
use crate::view::SortOrder;

/// Run one command against the configured store, writing the view to `out`.
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the command requires a
/// login and nobody is logged in, or the action itself fails.
pub async fn execute(
    command: Command,
    config: &Config,
    color: bool,
    out: &mut dyn Write,
) -> Result<()> {
    match command {
        Command::Config(cmd) => handle_config(config, cmd, out),
        command => {
            let mut session = Session::open(config, color)?;
            session.run(command, out).await
        }
    }
}

/// Loaded state plus the handles needed to act on it.
struct Session<'a> {
    config: &'a Config,
    storage: Arc<Mutex<Storage>>,
    api: LocalResidentApi,
    state: AppState,
    style: Style,
}

impl<'a> Session<'a> {
    fn open(config: &'a Config, color: bool) -> Result<Self> {
        let storage = Storage::open(config.database_path())?
            .with_namespace(config.storage.namespace.clone());
        let state = AppState::load(config, &storage)?;
        let style = Style::new(state.theme, color);

        debug!(
            "Session opened on {} (namespace {})",
            storage.path().display(),
            storage.namespace()
        );

        let storage = Arc::new(Mutex::new(storage));
        let api = LocalResidentApi::new(Arc::clone(&storage), Latency::from_config(config));

        Ok(Self {
            config,
            storage,
            api,
            state,
            style,
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Storage>> {
        self.storage
            .lock()
            .map_err(|_| Error::internal("storage lock poisoned"))
    }

    fn save(&self) -> Result<()> {
        let storage = self.lock()?;
        self.state.save(&storage)
    }

    async fn run(&mut self, command: Command, out: &mut dyn Write) -> Result<()> {
        if command.requires_login() {
            self.state.auth.require_user()?;
        }
        let result = match command {
            Command::Login(cmd) => self.login(&cmd, out),
            Command::Logout => self.logout(out),
            Command::Whoami => self.whoami(out),
            Command::Dashboard(cmd) => self.dashboard(cmd.json, out).await,
            Command::Residents(cmd) => self.residents(cmd, out).await,
            Command::Status(cmd) => self.status(&cmd, out),
            Command::Prefs(cmd) => self.prefs(cmd, out),
            Command::Config(cmd) => handle_config(self.config, cmd, out),
        };

        // Rollbacks have already restored the list, so state is consistent
        // whether or not the action succeeded.
        self.save()?;
        result
    }

    fn login(&mut self, cmd: &LoginCommand, out: &mut dyn Write) -> Result<()> {
        let user = self
            .state
            .auth
            .login(&self.config.auth, &cmd.email, &cmd.password)?;
        writeln!(out, "Logged in as {} <{}>", user.name, user.email)?;
        Ok(())
    }

    fn logout(&mut self, out: &mut dyn Write) -> Result<()> {
        self.state.auth.logout();
        writeln!(out, "Logged out.")?;
        Ok(())
    }

    fn whoami(&self, out: &mut dyn Write) -> Result<()> {
        let user = self.state.auth.require_user()?;
        writeln!(out, "{} <{}>", user.name, user.email)?;
        Ok(())
    }

    fn header(&self, active: &str) -> Result<String> {
        let user = self.state.auth.require_user()?;
        Ok(render::header(self.state.ui, user, active, self.style))
    }

    async fn dashboard(&mut self, json: bool, out: &mut dyn Write) -> Result<()> {
        self.state.residents.load_residents(&self.api).await?;
        let stats = DashboardStats::from_residents(&self.state.residents.residents);

        if json {
            writeln!(out, "{}", serde_json::to_string_pretty(&stats)?)?;
        } else {
            write!(out, "{}", self.header("Dashboard")?)?;
            write!(out, "{}", render::dashboard(&stats, self.style))?;
        }
        Ok(())
    }

    async fn residents(&mut self, cmd: ResidentsCommand, out: &mut dyn Write) -> Result<()> {
        self.state.residents.load_residents(&self.api).await?;
        match cmd {
            ResidentsCommand::List(cmd) => self.list(cmd, out),
            ResidentsCommand::Add(cmd) => self.add(cmd, out).await,
            ResidentsCommand::Edit(cmd) => self.edit(cmd, out).await,
            ResidentsCommand::Delete(cmd) => self.delete(&cmd, out).await,
        }
    }

    fn list(&mut self, cmd: ListCommand, out: &mut dyn Write) -> Result<()> {
        let residents = &mut self.state.residents;

        if cmd.reset {
            residents.reset_filters();
        }
        if let Some(query) = cmd.search {
            residents.set_search_query(query);
        }
        if let Some(filter) = cmd.filter {
            residents.set_filter_type(filter.into());
        }
        if let Some(column) = cmd.toggle_sort {
            residents.toggle_sort(column.into());
        } else if cmd.sort_by.is_some() || cmd.order.is_some() {
            let sort_by = cmd.sort_by.map_or(residents.view.sort_by, Into::into);
            let order = cmd.order.map_or(SortOrder::Asc, Into::into);
            residents.set_sorting(sort_by, order);
        }
        let page = cmd.page.unwrap_or(residents.view.current_page);
        residents.set_current_page(page);

        let page = residents.page();
        if cmd.json {
            writeln!(out, "{}", serde_json::to_string_pretty(&page)?)?;
        } else {
            write!(out, "{}", self.header("Residents")?)?;
            write!(
                out,
                "{}",
                render::residents_table(&page, &self.state.residents.view, self.style)
            )?;
        }
        Ok(())
    }

    async fn add(&mut self, cmd: AddCommand, out: &mut dyn Write) -> Result<()> {
        let residents = &mut self.state.residents;
        residents.open_modal(None)?;

        let mut new = NewResident::new(cmd.name, cmd.house, cmd.access_type.into());
        if let Some(last_visit) = cmd.last_visit {
            new = new.with_last_visit(last_visit);
        }

        let created = residents.add_resident(&self.api, new).await?;
        writeln!(out, "Resident added successfully")?;
        write!(out, "{}", render::resident_detail(&created, self.style))?;
        Ok(())
    }

    async fn edit(&mut self, cmd: EditCommand, out: &mut dyn Write) -> Result<()> {
        let residents = &mut self.state.residents;
        residents.open_modal(Some(&cmd.id))?;

        let update = ResidentUpdate {
            name: cmd.name,
            house_number: cmd.house,
            access_type: cmd.access_type.map(Into::into),
            last_visit: cmd.last_visit,
        };
        if update.is_empty() {
            residents.close_modal();
            writeln!(out, "Nothing to change.")?;
            return Ok(());
        }

        let updated = residents.update_resident(&self.api, &cmd.id, update).await?;
        writeln!(out, "Resident updated successfully")?;
        write!(out, "{}", render::resident_detail(&updated, self.style))?;
        Ok(())
    }

    async fn delete(&mut self, cmd: &DeleteCommand, out: &mut dyn Write) -> Result<()> {
        let residents = &mut self.state.residents;
        residents.open_delete_confirm(cmd.id.clone());

        if !cmd.yes {
            match residents.find(&cmd.id) {
                Some(resident) => writeln!(
                    out,
                    "Delete {} (house {})? This cannot be undone.",
                    resident.name, resident.house_number
                )?,
                None => writeln!(out, "Delete resident {}?", cmd.id)?,
            }
            writeln!(out, "Re-run with --yes to confirm.")?;
            residents.close_delete_confirm();
            return Ok(());
        }

        if residents.confirm_delete(&self.api).await? {
            writeln!(out, "Resident deleted successfully")?;
        } else {
            writeln!(out, "No resident with id {}; nothing deleted.", cmd.id)?;
        }
        Ok(())
    }

    fn status(&self, cmd: &StatusCommand, out: &mut dyn Write) -> Result<()> {
        let (stats, keys, namespace) = {
            let storage = self.lock()?;
            (storage.stats()?, storage.keys()?, storage.namespace().to_string())
        };
        let user = self.state.auth.user.as_ref();

        if cmd.json {
            let status = serde_json::json!({
                "database_path": self.config.database_path(),
                "namespace": namespace,
                "logged_in_as": user.map(|u| &u.email),
                "documents": keys,
                "document_bytes": stats.document_bytes,
                "last_updated": stats.last_updated.as_ref().map(format_timestamp),
                "db_size_bytes": stats.db_size_bytes,
            });
            writeln!(out, "{}", serde_json::to_string_pretty(&status)?)?;
        } else {
            writeln!(out, "estatectl status")?;
            writeln!(out, "----------------")?;
            writeln!(out, "Database:      {}", self.config.database_path().display())?;
            writeln!(out, "Namespace:     {namespace}")?;
            writeln!(
                out,
                "Logged in as:  {}",
                user.map_or("nobody", |u| u.email.as_str())
            )?;
            writeln!(
                out,
                "Documents:     {} ({} bytes)",
                stats.document_count, stats.document_bytes
            )?;
            for key in &keys {
                writeln!(out, "  - {key}")?;
            }
            if let Some(last_updated) = &stats.last_updated {
                writeln!(out, "Last write:    {}", format_timestamp(last_updated))?;
            }
        }
        Ok(())
    }

    fn prefs(&mut self, cmd: PrefsCommand, out: &mut dyn Write) -> Result<()> {
        match cmd {
            PrefsCommand::Show { json } => {
                if json {
                    let prefs = serde_json::json!({
                        "theme": self.state.theme,
                        "ui": self.state.ui,
                    });
                    writeln!(out, "{}", serde_json::to_string_pretty(&prefs)?)?;
                    return Ok(());
                }
            }
            PrefsCommand::Theme => self.state.theme.toggle_theme(),
            PrefsCommand::Sidebar => self.state.ui.toggle_sidebar(),
        }
        write!(out, "{}", render::preferences(self.state.theme, self.state.ui))?;
        Ok(())
    }
}

fn handle_config(config: &Config, cmd: ConfigCommand, out: &mut dyn Write) -> Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                writeln!(out, "{}", serde_json::to_string_pretty(config)?)?;
            } else {
                writeln!(out, "Current Configuration")?;
                writeln!(out, "=====================")?;
                writeln!(out)?;
                writeln!(out, "[Storage]")?;
                writeln!(out, "  Database path:      {}", config.database_path().display())?;
                writeln!(out, "  Namespace:          {}", config.storage.namespace)?;
                writeln!(out)?;
                writeln!(out, "[Api]")?;
                writeln!(out, "  Fetch delay (ms):   {}", config.api.fetch_delay_ms)?;
                writeln!(out, "  Mutate delay (ms):  {}", config.api.mutate_delay_ms)?;
                writeln!(out)?;
                writeln!(out, "[Auth]")?;
                writeln!(out, "  Admin email:        {}", config.auth.admin_email)?;
                writeln!(out, "  Admin name:         {}", config.auth.admin_name)?;
                writeln!(out)?;
                writeln!(out, "[Residents]")?;
                writeln!(out, "  Items per page:     {}", config.residents.items_per_page)?;
            }
        }
        ConfigCommand::Path => {
            writeln!(out, "{}", Config::default_config_path().display())?;
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            writeln!(out, "Validating configuration: {}", path.display())?;
            Config::load_from(Some(path))?;
            writeln!(out, "Configuration is valid.")?;
        }
    }
    Ok(())
}
