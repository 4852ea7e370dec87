//! StreamLogic CLI
//!
//! Renders raw planning problems into solver input and decodes the solver's
//! plans back into raw values.

mod cli;
mod config;
mod logging;
mod output;
mod problem_file;

use anyhow::{Context, Result};
use clap::Parser;
use std::fs;
use std::path::Path;
use std::process;

use streamlogic_ir::{
    decode_plan, parse_plan, parse_plan_cost, value_plan, PlanStep, Session, Value,
};

use cli::{Cli, Commands, ConfigCommand, PlanFormat};
use config::Config;
use output::{enable_colors, print_error, print_header, print_info, print_success};
use problem_file::ProblemFile;

fn main() {
    if let Err(e) = run() {
        print_error(&format!("{:#}", e));
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = if cli.no_config {
        Config::default()
    } else {
        Config::load_default()
    };

    let colored = config.colored && !cli.no_color;
    enable_colors(colored);
    logging::init(cli.log_level.unwrap_or(config.log_level), colored)?;

    match cli.command {
        Commands::Render {
            input,
            output,
            objects,
            name,
        } => render(&config, &input, output.as_deref(), objects.as_deref(), name),
        Commands::Decode {
            plan,
            objects,
            format,
        } => decode(&plan, &objects, format),
        Commands::Config { command } => handle_config_command(&config, command),
    }
}

fn render(
    config: &Config,
    input: &Path,
    output: Option<&Path>,
    objects: Option<&Path>,
    name: Option<String>,
) -> Result<()> {
    let text = fs::read_to_string(input)
        .with_context(|| format!("Failed to read problem file: {}", input.display()))?;
    let file = ProblemFile::parse(&text)
        .with_context(|| format!("Invalid problem file: {}", input.display()))?;

    let name = name
        .or_else(|| file.name.clone())
        .unwrap_or_else(|| config.default_problem_name.clone());
    let problem = file.into_problem();

    let mut session =
        Session::with_config(config.session.clone()).context("Invalid [session] configuration")?;
    let converted = problem
        .to_reference_space(&mut session)
        .context("Failed to convert problem")?;
    let rendered = converted
        .render(&session, &name, &problem.domain)
        .context("Failed to render problem")?;

    tracing::info!(
        problem = %name,
        objects = session.objects().len(),
        facts = converted.evaluations.len(),
        "rendered problem"
    );

    match output {
        Some(path) => {
            fs::write(path, &rendered)
                .with_context(|| format!("Failed to write problem: {}", path.display()))?;
            print_success(&format!("Problem written to {}", path.display()));
        }
        None => print!("{}", rendered),
    }

    if let Some(path) = objects {
        let json = session.to_json().context("Failed to serialize object table")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write object table: {}", path.display()))?;
        print_info(&format!(
            "{} objects written to {}",
            session.objects().len(),
            path.display()
        ));
    }

    Ok(())
}

fn decode(plan: &Path, objects: &Path, format: PlanFormat) -> Result<()> {
    let json = fs::read_to_string(objects)
        .with_context(|| format!("Failed to read object table: {}", objects.display()))?;
    let session = Session::from_json(&json)
        .with_context(|| format!("Invalid object table: {}", objects.display()))?;

    let text = fs::read_to_string(plan)
        .with_context(|| format!("Failed to read plan file: {}", plan.display()))?;
    let steps = parse_plan(&text).context("Failed to parse plan")?;
    let decoded = decode_plan(&session, &steps).context("Failed to decode plan")?;
    let values = value_plan(&session, &decoded).context("Failed to decode plan")?;
    let cost = parse_plan_cost(&text);

    tracing::info!(steps = values.len(), ?cost, "decoded plan");

    match format {
        PlanFormat::Text => print_plan(&values, cost),
        PlanFormat::Json => {
            let report = serde_json::json!({ "plan": values, "cost": cost });
            println!(
                "{}",
                serde_json::to_string_pretty(&report).context("Failed to serialize plan")?
            );
        }
    }
    Ok(())
}

fn print_plan(steps: &[PlanStep<Value>], cost: Option<f64>) {
    print_header("Plan");
    for (i, step) in steps.iter().enumerate() {
        println!("{:>3}. {}", i + 1, step);
    }
    if let Some(cost) = cost {
        println!("\nCost: {}", cost);
    }
}

fn handle_config_command(config: &Config, command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let toml = toml::to_string_pretty(config)?;
            println!("{}", toml);
        }
        ConfigCommand::Path => {
            let path = Config::config_path();
            println!("{}", path.display());
        }
        ConfigCommand::Init => {
            let path = Config::create_default()?;
            print_success(&format!("Created default configuration at {}", path.display()));
        }
    }
    Ok(())
}
