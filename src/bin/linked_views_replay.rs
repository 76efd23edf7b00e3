use lexis_views::api::{EngineSnapshot, LinkedViewsConfig, LinkedViewsEngine};
use lexis_views::interaction::Intent;
use lexis_views::render::{RecordingView, ViewKind};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

const USAGE: &str =
    "usage: linked_views_replay --data <leaders.csv> --script <intents.json> [--output <path>]";

#[derive(Debug)]
struct CliArgs {
    data: PathBuf,
    script: PathBuf,
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
struct ReplayScript {
    #[serde(default)]
    config: LinkedViewsConfig,
    steps: Vec<Intent>,
}

#[derive(Debug, Clone, Serialize)]
struct ReplayStep {
    step: usize,
    intent: Option<Intent>,
    error: Option<String>,
    snapshot: EngineSnapshot,
}

fn main() {
    let _ = lexis_views::telemetry::init_tracing_with_fallback("lexis_views=info");
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let data = read(&args.data)?;
    let script: ReplayScript =
        serde_json::from_str(&read(&args.script)?).map_err(|err| format!("invalid json: {err}"))?;
    script.config.validate().map_err(|err| err.to_string())?;

    let (mut engine, report) =
        LinkedViewsEngine::from_tabular_str(&data, script.config).map_err(|err| err.to_string())?;
    info!(
        records = report.records_loaded,
        excluded = report.excluded_non_positive_duration,
        skipped = report.skipped_malformed,
        "dataset loaded"
    );

    for (id, kind) in [
        ("lexis", ViewKind::Lexis),
        ("bar", ViewKind::Bar),
        ("scatter", ViewKind::Scatter),
    ] {
        let (view, _) = RecordingView::new(id, kind);
        engine
            .register_view(Box::new(view))
            .map_err(|err| err.to_string())?;
    }
    engine.render_all().map_err(|err| err.to_string())?;

    let mut steps = vec![ReplayStep {
        step: 0,
        intent: None,
        error: None,
        snapshot: engine.snapshot(),
    }];
    for (index, intent) in script.steps.into_iter().enumerate() {
        let error = engine.dispatch(intent.clone()).err().map(|err| err.to_string());
        steps.push(ReplayStep {
            step: index + 1,
            intent: Some(intent),
            error,
            snapshot: engine.snapshot(),
        });
    }

    let json = serde_json::to_string_pretty(&steps)
        .map_err(|err| format!("failed to serialize replay: {err}"))?;
    match args.output {
        Some(path) => fs::write(&path, json)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{json}");
            Ok(())
        }
    }
}

fn read(path: &Path) -> Result<String, String> {
    fs::read_to_string(path).map_err(|err| format!("failed to read `{}`: {err}", path.display()))
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut data = None::<PathBuf>;
    let mut script = None::<PathBuf>;
    let mut output = None::<PathBuf>;

    while let Some(flag) = args.next() {
        let mut value = |name: &str| {
            args.next()
                .map(PathBuf::from)
                .ok_or_else(|| format!("missing value for {name}"))
        };
        match flag.as_str() {
            "--data" => data = Some(value("--data")?),
            "--script" => script = Some(value("--script")?),
            "--output" => output = Some(value("--output")?),
            "--help" | "-h" => return Err(USAGE.to_owned()),
            other => return Err(format!("unknown flag `{other}`\n{USAGE}")),
        }
    }

    Ok(CliArgs {
        data: data.ok_or_else(|| USAGE.to_owned())?,
        script: script.ok_or_else(|| USAGE.to_owned())?,
        output,
    })
}
