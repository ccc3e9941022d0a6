use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, Table};

use jmxforge::environment::{ConfigLoader, EnvironmentConfig};
use jmxforge::model::{Locale, Request, Test, ValidationReport, messages};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 编译测试为 `<测试名>.jmx`
    Compile {
        path: PathBuf,

        /// 输出目录，默认当前目录
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// 环境配置文件，默认自动查找 jmxforge.toml
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// 校验测试并输出第一个错误
    Validate {
        path: PathBuf,

        #[arg(long, default_value = "en")]
        locale: Locale,

        /// 以 `{isValid, info, path}` JSON 输出
        #[arg(long)]
        json: bool,
    },
    /// 输出用于传输的 JSON
    Export { path: PathBuf },
    /// 以表格列出场景和请求
    Inspect {
        path: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,
    },
}

pub async fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Compile {
            path,
            output,
            config,
        } => compile(&path, output, config.as_deref()).await,
        Commands::Validate { path, locale, json } => validate(&path, locale, json).await,
        Commands::Export { path } => {
            let test = load_test(&path).await?;
            println!("{}", test.export()?);
            Ok(())
        }
        Commands::Inspect { path, config } => {
            let mut test = load_test(&path).await?;
            attach_environments(&mut test, config.as_deref())?;
            inspect(&test);
            Ok(())
        }
    }
}

async fn load_test(path: &Path) -> Result<Test> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let test = Test::from_json(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    Ok(test)
}

fn load_config(path: Option<&Path>) -> Result<Option<EnvironmentConfig>> {
    match path {
        Some(path) => Ok(Some(ConfigLoader::load_from_path(path)?)),
        None => Ok(ConfigLoader::find_and_load()),
    }
}

fn attach_environments(test: &mut Test, config: Option<&Path>) -> Result<()> {
    if let Some(config) = load_config(config)? {
        let attached = ConfigLoader::attach(&config, test);
        tracing::debug!("Attached {} environment(s)", attached);
    }
    Ok(())
}

async fn compile(path: &Path, output: Option<PathBuf>, config: Option<&Path>) -> Result<()> {
    let mut test = load_test(path).await?;
    attach_environments(&mut test, config)?;

    let file = test.to_jmx()?;
    let dir = output.unwrap_or_else(|| PathBuf::from("."));
    tokio::fs::create_dir_all(&dir).await?;

    let target = dir.join(&file.name);
    tokio::fs::write(&target, &file.xml)
        .await
        .with_context(|| format!("Failed to write {}", target.display()))?;

    println!("{} {}", "✓".green(), target.display());
    Ok(())
}

async fn validate(path: &Path, locale: Locale, json: bool) -> Result<()> {
    let test = load_test(path).await?;
    let result = test.validate();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&ValidationReport::from(&result))?
        );
    }

    match result {
        Ok(()) => {
            if !json {
                println!("{} {}", "✓".green(), "Test is valid".green());
            }
            Ok(())
        }
        Err(err) => {
            if !json {
                let location = if err.path.is_empty() {
                    String::new()
                } else {
                    format!(" ({})", err.path.dimmed())
                };
                println!(
                    "{} {}{}",
                    "✗".red(),
                    messages::message(err.code, locale).red(),
                    location
                );
            }
            bail!("{}", messages::message(err.code, locale))
        }
    }
}

fn request_target(request: &Request) -> String {
    match request {
        Request::Http(http) if http.use_environment => {
            http.path.clone().unwrap_or_default()
        }
        Request::Http(http) => http.url.clone().unwrap_or_default(),
        Request::Dubbo(rpc) => format!(
            "{}#{}",
            rpc.interface.as_deref().unwrap_or_default(),
            rpc.method.as_deref().unwrap_or_default()
        ),
    }
}

fn inspect(test: &Test) {
    println!(
        "{} {}",
        test.name.as_deref().unwrap_or_default().bold(),
        test.id.dimmed()
    );

    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Scenario",
        "#",
        "Type",
        "Method",
        "Name",
        "Target",
        "Valid",
    ]);

    for scenario in &test.scenario_definition {
        let environment_id = scenario.environment_id.as_deref();
        for (i, request) in scenario.requests.iter().enumerate() {
            let valid = match request.validate(environment_id) {
                Ok(()) => Cell::new("✓").fg(Color::Green),
                Err(e) => Cell::new(e.info()).fg(Color::Red),
            };

            table.add_row(vec![
                Cell::new(scenario.name()),
                Cell::new(i + 1),
                Cell::new(request.show_type()),
                Cell::new(request.show_method()).fg(Color::Cyan),
                Cell::new(request.name().unwrap_or_default()),
                Cell::new(request_target(request)).add_attribute(Attribute::Dim),
                valid,
            ]);
        }
    }

    println!("{}", table);
}
