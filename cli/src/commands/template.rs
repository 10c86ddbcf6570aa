//! `esx template`: templates stored under the configured datastore directory.

use std::process::ExitCode;

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::HypervisorConnector;
use crate::application::services::inventory;
use crate::domain::VmError;
use crate::output::TerminalReporter;

/// Template subcommands.
#[derive(Subcommand)]
pub enum TemplateCommand {
    /// List templates in the templates directory
    List,
}

/// Run the template command.
///
/// # Errors
///
/// Returns an error if no templates directory is configured, the connection
/// fails, or the datastore cannot be listed.
pub async fn run<C: HypervisorConnector>(
    app: &mut AppContext<C>,
    cmd: TemplateCommand,
) -> Result<ExitCode> {
    match cmd {
        TemplateCommand::List => {
            if app.config.templates_dir.trim().is_empty() {
                return Err(VmError::TemplatesDirNotSet.into());
            }
            let reporter = TerminalReporter::new(&app.output);
            let conn = app.session.ensure_connected(&reporter).await?;
            let templates = inventory::list_templates(conn, &app.config.templates_dir).await?;
            drop(reporter);

            if templates.is_empty() {
                app.output
                    .info(&format!("No templates in {}", app.config.templates_dir));
                return Ok(ExitCode::SUCCESS);
            }
            app.output.header(&app.config.templates_dir);
            for name in &templates {
                println!("    {name}");
            }
            Ok(ExitCode::SUCCESS)
        }
    }
}
