//! Subcommand handlers.

use std::path::Path;
use std::process::{Command, ExitCode};

use anyhow::{bail, Context};
use chrono::{Local, NaiveDate, TimeZone};
use hemolog_core::date::{local_midnight, parse_day};
use hemolog_core::host::resolve_api_key;
use hemolog_core::render::choice_glyph;
use hemolog_core::{
    HemologClient, ListItem, LogEndpoint, LogForm, RecordInput, RecordList, RecordType,
    HEMOLOG_HOME_URL,
};
use tracing::{debug, warn};

use crate::cli::{Cli, Commands, LogArgs};
use crate::settings::Settings;
use crate::terminal::{format_toast, render_list, TerminalUi};
use crate::transport::UreqTransport;

pub fn run(cli: Cli) -> anyhow::Result<ExitCode> {
    let path = match cli.config {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    debug!(path = %path.display(), "using settings file");

    match cli.command {
        Commands::Config {
            print,
            api_key,
            base_url,
        } => configure(&path, print, api_key, base_url),
        Commands::Open => Ok(open_home()),
        Commands::Recent { record_type } => recent(&load_settings(&path)?, record_type.as_deref()),
        Commands::LogInfusion(args) => log(&load_settings(&path)?, LogEndpoint::Infusion, args),
        Commands::LogTreatment(args) => log(&load_settings(&path)?, LogEndpoint::Treatment, args),
    }
}

fn load_settings(path: &Path) -> anyhow::Result<Settings> {
    Ok(Settings::load(path)?.with_env(|name| std::env::var(name).ok()))
}

fn api_key(settings: &Settings) -> anyhow::Result<String> {
    resolve_api_key(settings).context("set one with `hemolog config --set-api-key <key>`")
}

fn exit_code(ok: bool) -> ExitCode {
    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

fn recent(settings: &Settings, record_type: Option<&str>) -> anyhow::Result<ExitCode> {
    let api_key = api_key(settings)?;
    let client = HemologClient::new(&settings.base_url);
    let mut transport = UreqTransport::new();
    let mut ui = TerminalUi::new("Loading recent records");

    let mut list = RecordList::new();
    list.load(&client, &api_key, &mut transport, &mut ui);
    print!("{}", render_list(&filter_by_type(list.items(), record_type)));
    Ok(exit_code(ui.failures() == 0))
}

/// Keep the rows whose type contains `query`, ignoring case. Order is kept.
pub fn filter_by_type(items: Vec<ListItem>, query: Option<&str>) -> Vec<ListItem> {
    let query = match query.map(str::trim) {
        Some(query) if !query.is_empty() => query.to_lowercase(),
        _ => return items,
    };
    items
        .into_iter()
        .filter(|item| item.title.to_lowercase().contains(&query))
        .collect()
}

fn log(settings: &Settings, endpoint: LogEndpoint, args: LogArgs) -> anyhow::Result<ExitCode> {
    let api_key = api_key(settings)?;
    let today = Local::now().date_naive();
    let input = form_input(endpoint, args, today, &Local)?;
    let client = HemologClient::new(&settings.base_url);
    let mut transport = UreqTransport::new();
    let mut ui = TerminalUi::new(endpoint.action_title());

    let submitted = LogForm::new(endpoint)
        .submit(&client, &input, &api_key, &mut transport, &mut ui)
        .is_ok();
    Ok(exit_code(submitted))
}

/// The form's dropdown as text: `🔵 Prophy (PROPHY), ...`.
pub fn describe_choices(endpoint: LogEndpoint) -> String {
    endpoint
        .choices()
        .iter()
        .map(|choice| format!("{} {} ({})", choice_glyph(choice), choice.label(), choice))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Fill the form the way its widgets would: type and date default to the
/// dropdown's first choice and today.
pub fn form_input<Tz: TimeZone>(
    endpoint: LogEndpoint,
    args: LogArgs,
    today: NaiveDate,
    tz: &Tz,
) -> anyhow::Result<RecordInput> {
    let record_type = match args.record_type {
        Some(raw) => {
            let parsed = RecordType::parse(&raw.trim().to_ascii_uppercase());
            if !endpoint.choices().contains(&parsed) {
                bail!(
                    "unknown type {raw:?}, expected one of {}",
                    describe_choices(endpoint)
                );
            }
            parsed
        }
        None => endpoint.default_type(),
    };
    let day = match args.date {
        Some(raw) => parse_day(&raw)?,
        None => today,
    };
    Ok(RecordInput {
        record_type: Some(record_type),
        date: Some(local_midnight(day, tz)),
        sites: args.sites,
        cause: args.cause,
    })
}

fn configure(
    path: &Path,
    print: bool,
    api_key: Option<String>,
    base_url: Option<String>,
) -> anyhow::Result<ExitCode> {
    let mut settings = Settings::load(path)?;
    let changed = api_key.is_some() || base_url.is_some();

    if let Some(key) = api_key {
        if key.trim().is_empty() {
            bail!("API key must not be empty");
        }
        settings.api_key = Some(key.trim().to_string());
    }
    if let Some(url) = base_url {
        settings.base_url = url.trim().trim_end_matches('/').to_string();
    }
    if changed {
        settings.save(path)?;
        eprintln!(
            "{}",
            format_toast(&hemolog_core::Toast::success(&format!(
                "Settings saved to {}",
                path.display()
            )))
        );
    }
    if print || !changed {
        println!("file:     {}", path.display());
        println!("api_key:  {}", settings.masked_key());
        println!("base_url: {}", settings.base_url);
    }
    Ok(ExitCode::SUCCESS)
}

fn open_home() -> ExitCode {
    println!("{HEMOLOG_HOME_URL}");
    let (program, leading): (&str, &[&str]) = if cfg!(target_os = "macos") {
        ("open", &[])
    } else if cfg!(target_os = "windows") {
        ("cmd", &["/C", "start", ""])
    } else {
        ("xdg-open", &[])
    };
    match Command::new(program).args(leading).arg(HEMOLOG_HOME_URL).status() {
        Ok(status) if status.success() => ExitCode::SUCCESS,
        Ok(status) => {
            warn!(program, %status, "browser opener exited with an error");
            ExitCode::FAILURE
        }
        Err(e) => {
            warn!(program, error = %e, "could not launch browser opener");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;
    use hemolog_core::date::submission_date;

    fn args(record_type: Option<&str>, date: Option<&str>) -> LogArgs {
        LogArgs {
            record_type: record_type.map(str::to_string),
            date: date.map(str::to_string),
            sites: None,
            cause: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap()
    }

    fn tz() -> FixedOffset {
        FixedOffset::east_opt(9 * 3600).unwrap()
    }

    #[test]
    fn defaults_follow_the_form() {
        let input = form_input(LogEndpoint::Treatment, args(None, None), today(), &tz()).unwrap();
        assert_eq!(input.record_type, Some(RecordType::Antibody));
        assert_eq!(submission_date(&input.date.unwrap()).unwrap(), "2024-05-01");

        let input = form_input(LogEndpoint::Infusion, args(None, None), today(), &tz()).unwrap();
        assert_eq!(input.record_type, Some(RecordType::Prophy));
    }

    #[test]
    fn type_is_case_insensitive() {
        let input =
            form_input(LogEndpoint::Infusion, args(Some("bleed"), None), today(), &tz()).unwrap();
        assert_eq!(input.record_type, Some(RecordType::Bleed));
    }

    #[test]
    fn type_outside_the_dropdown_is_rejected() {
        let err = form_input(LogEndpoint::Infusion, args(Some("ANTIBODY"), None), today(), &tz())
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown type \"ANTIBODY\", expected one of \
             🔵 Prophy (PROPHY), 🔴 Bleed (BLEED), 🟢 Preventative (PREVENTATIVE)"
        );
    }

    #[test]
    fn treatment_choices_lead_with_antibody() {
        assert!(describe_choices(LogEndpoint::Treatment).starts_with("⚫ Antibody (ANTIBODY), "));
    }

    fn row(title: &str, date: &str) -> ListItem {
        ListItem {
            id: None,
            title: title.into(),
            subtitle: String::new(),
            icon: hemolog_core::Icon::for_type(&RecordType::parse(title)),
            accessory: date.into(),
        }
    }

    #[test]
    fn type_filter_ignores_case_and_keeps_order() {
        let items = vec![
            row("BLEED", "2024-03-03"),
            row("PROPHY", "2024-03-02"),
            row("BLEED", "2024-03-01"),
        ];
        let kept = filter_by_type(items.clone(), Some(" bleed "));
        let dates: Vec<&str> = kept.iter().map(|i| i.accessory.as_str()).collect();
        assert_eq!(dates, ["2024-03-03", "2024-03-01"]);

        assert_eq!(filter_by_type(items.clone(), None), items);
        assert_eq!(filter_by_type(items.clone(), Some("")), items);
        assert!(filter_by_type(items, Some("antibody")).is_empty());
    }

    #[test]
    fn explicit_date_is_local_midnight() {
        let input = form_input(
            LogEndpoint::Infusion,
            args(None, Some("2024-03-01")),
            today(),
            &tz(),
        )
        .unwrap();
        let picked = input.date.unwrap();
        assert_eq!(picked.offset(), &tz());
        assert_eq!(submission_date(&picked).unwrap(), "2024-03-01");
    }

    #[test]
    fn malformed_date_is_rejected() {
        assert!(form_input(LogEndpoint::Infusion, args(None, Some("03/01/2024")), today(), &tz())
            .is_err());
    }
}
