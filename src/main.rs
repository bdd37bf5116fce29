//! youtrack - inspect a YouTrack instance through the typed SDK.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing::{error, info, warn};

use youtrack_sdk::api::{Page, YouTrackClient};
use youtrack_sdk::codec::{self, WireValue};
use youtrack_sdk::config::{Config, Settings, TOKEN_ENV};
use youtrack_sdk::model::{
    Agile, BundleElement, Issue, IssueAttachment, IssueComment, IssueCustomFieldType, IssueLink,
    IssueLinkType, IssueWorkItem, Project, ProjectCustomFieldType, Sprint, Tag, User,
    WorkItemType,
};
use youtrack_sdk::projection::ProjectionError;
use youtrack_sdk::{field_selector, logging};

#[derive(Debug, Parser)]
#[command(name = "youtrack", version, about = "Inspect a YouTrack instance")]
struct Cli {
    /// Profile from the configuration file.
    #[arg(long, global = true)]
    profile: Option<String>,

    /// Server URL, e.g. https://youtrack.example.com. Overrides the profile.
    #[arg(long, global = true, env = "YOUTRACK_URL")]
    url: Option<String>,

    /// Permanent token, used together with --url.
    #[arg(long, global = true, env = TOKEN_ENV, hide_env_values = true)]
    token: Option<String>,

    /// Configuration file to read instead of the default one.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Also log to stderr.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List the custom fields of a project and one issue's values.
    CustomFields {
        /// Project id or short name, e.g. DEMO.
        project: String,
    },
    /// Print an issue as JSON.
    Issue {
        /// Issue id, e.g. DEMO-12.
        id: String,
    },
    /// Print the field selector requested for a model type.
    Fields {
        /// Type name, e.g. Issue or ProjectCustomField.
        entity: String,
    },
}

/// Model types whose selector `youtrack fields` can print.
const ENTITY_NAMES: &[&str] = &[
    "Agile",
    "BundleElement",
    "Issue",
    "IssueAttachment",
    "IssueComment",
    "IssueCustomField",
    "IssueLink",
    "IssueLinkType",
    "IssueWorkItem",
    "Project",
    "ProjectCustomField",
    "Sprint",
    "Tag",
    "User",
    "WorkItemType",
];

fn selector_for(name: &str) -> Option<Result<Option<String>, ProjectionError>> {
    let selector = match name {
        "Agile" => field_selector::<Agile>(),
        "BundleElement" => field_selector::<BundleElement>(),
        "Issue" => field_selector::<Issue>(),
        "IssueAttachment" => field_selector::<IssueAttachment>(),
        "IssueComment" => field_selector::<IssueComment>(),
        "IssueCustomField" => field_selector::<IssueCustomFieldType>(),
        "IssueLink" => field_selector::<IssueLink>(),
        "IssueLinkType" => field_selector::<IssueLinkType>(),
        "IssueWorkItem" => field_selector::<IssueWorkItem>(),
        "Project" => field_selector::<Project>(),
        "ProjectCustomField" => field_selector::<ProjectCustomFieldType>(),
        "Sprint" => field_selector::<Sprint>(),
        "Tag" => field_selector::<Tag>(),
        "User" => field_selector::<User>(),
        "WorkItemType" => field_selector::<WorkItemType>(),
        _ => return None,
    };
    Some(selector)
}

fn build_client(cli: &Cli) -> anyhow::Result<YouTrackClient> {
    if let Some(url) = &cli.url {
        let Some(token) = &cli.token else {
            bail!("--url requires a token; pass --token or set {}", TOKEN_ENV);
        };
        let timeouts = fallback_settings(cli).timeouts();
        return Ok(YouTrackClient::with_timeouts(url, token, timeouts)?);
    }

    let config = load_config(cli)?;
    let profile = config.profile(cli.profile.as_deref())?;
    info!(profile = %profile.name, "Using profile");
    Ok(YouTrackClient::from_profile(profile, &config.settings)?)
}

/// Settings for a fully specified `--url` invocation, which must not fail
/// because of the configuration file.
fn fallback_settings(cli: &Cli) -> Settings {
    match load_config(cli) {
        Ok(config) => config.settings,
        Err(e) => {
            warn!(error = %format!("{:#}", e), "Ignoring configuration, using default settings");
            Settings::default()
        }
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path),
        None => Config::load(),
    };
    config.context("Failed to load configuration")
}

fn pretty(value: &WireValue) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(&codec::to_json_value(value)?)?)
}

async fn custom_fields(client: &YouTrackClient, project: &str) -> anyhow::Result<()> {
    println!("Fetching custom fields for project: {}", project);
    println!("{}", "=".repeat(80));
    println!();

    let fields = match client.get_project_custom_fields(project, Page::default()).await {
        Ok(fields) => fields,
        Err(e) if e.is_not_found() => {
            eprintln!("Error: Project '{}' not found.\n", project);
            eprintln!("Available projects:");
            match client.get_projects(Page::default()).await {
                Ok(projects) => {
                    for project in projects {
                        eprintln!(
                            "  - {}: {}",
                            project.short_name().as_deref().unwrap_or_default(),
                            project.name().as_deref().unwrap_or("Unknown")
                        );
                    }
                }
                Err(e) => eprintln!("  Could not retrieve projects: {}", e.user_message()),
            }
            bail!("project '{}' not found", project);
        }
        Err(e) => return Err(e.into()),
    };

    if fields.is_empty() {
        println!("No custom fields found for this project.");
        return Ok(());
    }

    println!("Found {} custom field(s):\n", fields.len());
    for (idx, field) in fields.iter().enumerate() {
        print_project_field(idx + 1, field);
    }

    println!("\n{}", "=".repeat(80));
    println!("EXAMPLE ISSUE WITH CUSTOM FIELD VALUES");
    println!("{}", "=".repeat(80));
    println!();

    let query = format!("project: {}", project);
    let issues = client
        .get_issues::<Issue>(Some(&query), &[], Page::first(1))
        .await
        .context("Could not fetch example issue")?;
    let Some(issue) = issues.first() else {
        println!("No issues found in project {}", project);
        return Ok(());
    };

    println!("Issue: {}", issue.id_readable().as_deref().unwrap_or_default());
    if let Some(summary) = issue.summary() {
        println!("Summary: {}", summary);
    }
    println!("Link: {}", client.get_absolute_url(&issue.url()));
    println!();

    match issue.custom_fields() {
        Some(custom_fields) if !custom_fields.is_empty() => {
            println!("Custom Fields:");
            for field in custom_fields {
                print_issue_field(field)?;
            }
        }
        _ => println!("No custom fields on this issue"),
    }

    Ok(())
}

fn print_project_field(idx: usize, field: &ProjectCustomFieldType) {
    println!("{}. {}", idx, field.name().unwrap_or("Unknown"));
    println!("   ID: {}", field.id().unwrap_or("unknown"));
    println!("   Type: {}", field.type_tag().unwrap_or("unknown"));
    if let Some(field_type) = field.field_type_id() {
        println!("   Field Type: {}", field_type);
        println!("   Multi-value: {}", field_type.contains("[*]"));
    }
    println!("   Can be empty: {:?}", field.can_be_empty());
    println!("   Is public: {:?}", field.is_public());

    let values = field.bundle_value_names();
    if !values.is_empty() {
        println!("   Values ({}):", values.len());
        for value in values {
            println!("      - {}", value);
        }
    }
    println!();
}

fn print_issue_field(field: &IssueCustomFieldType) -> anyhow::Result<()> {
    println!(
        "  {} (ID: {}):",
        field.name().unwrap_or("Unknown field"),
        field.id().unwrap_or("unknown")
    );
    match field.wire_value() {
        WireValue::Null => println!("    Value: (empty)"),
        WireValue::Seq(values) if field.is_multi_value() => {
            println!("    Values ({}):", values.len());
            for value in &values {
                println!("      - {}", pretty(value)?.replace('\n', " "));
            }
        }
        value => println!("    Value: {}", pretty(&value)?.replace('\n', " ")),
    }
    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    match &cli.command {
        Command::Fields { entity } => {
            let Some(selector) = selector_for(entity) else {
                bail!(
                    "unknown entity '{}'; expected one of: {}",
                    entity,
                    ENTITY_NAMES.join(", ")
                );
            };
            println!("{}", selector?.unwrap_or_default());
        }
        Command::Issue { id } => {
            let client = build_client(&cli)?;
            let issue = client.get_issue(id).await?;
            let map = codec::to_wire_map(Some(&issue))?.unwrap_or_default();
            println!("{}", pretty(&WireValue::Map(map))?);
        }
        Command::CustomFields { project } => {
            let client = build_client(&cli)?;
            custom_fields(&client, project).await?;
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.verbose) {
        eprintln!("Warning: logging disabled: {:#}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %format!("{:#}", e), "Command failed");
            match e.downcast_ref::<youtrack_sdk::Error>() {
                Some(sdk) => {
                    eprintln!("Error: {}", sdk.user_message());
                    if let Some(action) = sdk.suggested_action() {
                        eprintln!("Hint: {}", action);
                    }
                }
                None => eprintln!("Error: {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_every_listed_entity_has_a_selector() {
        for name in ENTITY_NAMES {
            let selector = selector_for(name).unwrap().unwrap();
            assert!(selector.is_some_and(|s| s.contains("id")), "{}", name);
        }
        assert!(selector_for("Nope").is_none());
        assert_eq!(
            selector_for("Project").unwrap().unwrap().as_deref(),
            Some("$type,id,name,shortName")
        );
    }

    #[test]
    fn test_parse_fields_command() {
        let cli = Cli::try_parse_from(["youtrack", "fields", "Issue"]).unwrap();
        assert!(matches!(cli.command, Command::Fields { ref entity } if entity == "Issue"));
    }

    #[test]
    fn test_explicit_url_ignores_broken_config() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "profiles = 3").unwrap();

        let cli = Cli::try_parse_from([
            "youtrack",
            "issue",
            "DEMO-1",
            "--config",
            path.to_str().unwrap(),
            "--url",
            "https://yt.example.com",
            "--token",
            "perm:abc",
        ])
        .unwrap();
        assert_eq!(fallback_settings(&cli), Settings::default());
        let client = build_client(&cli).unwrap();
        assert_eq!(client.base_url(), "https://yt.example.com");

        let cli = Cli::try_parse_from([
            "youtrack",
            "issue",
            "DEMO-1",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert!(build_client(&cli).is_err());
    }

    #[test]
    fn test_parse_global_options_after_subcommand() {
        let cli = Cli::try_parse_from([
            "youtrack",
            "issue",
            "DEMO-1",
            "--url",
            "https://yt.example.com",
            "--token",
            "perm:abc",
        ])
        .unwrap();
        assert_eq!(cli.url.as_deref(), Some("https://yt.example.com"));
        assert_eq!(cli.token.as_deref(), Some("perm:abc"));
    }
}
