//! `cereal`: turns a folder of Markdown files into React page components.
//!
//! A thin shim over `cereal-jsx` that layers a config file and flags onto
//! the default options, walks the input folder and writes one `.jsx`
//! module per Markdown file.

mod files;

use anyhow::{Context, Result};
use cereal_jsx::{
    BatchInput, BatchOptions, BatchStats, LogInstrumentation, OptionOverrides, Options,
    Transformer,
};
use clap::Parser;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

const DEFAULT_INPUT_PATH: &str = "markdown";
const DEFAULT_OUTPUT_PATH: &str = "jsxMarkdown";

/// Convert Markdown files (with HTML and front matter) into React JSX pages.
#[derive(Parser, Debug)]
#[command(
    name = "cereal",
    version,
    about = "Convert Markdown files (with HTML and front matter) into React JSX pages",
    after_help = "Example: cereal -i ./src/markdown -o ./src/jsxPages -c ./.cerealrc.json"
)]
struct Cli {
    /// Target folder or file with .md files to convert.
    #[arg(short = 'i', long)]
    input_path: Option<PathBuf>,

    /// Output folder for the compiled .jsx files.
    #[arg(short = 'o', long)]
    output_path: Option<PathBuf>,

    /// Delete existing content in the output folder before writing.
    #[arg(long, alias = "del")]
    delete_existing_output_folder: bool,

    /// Path to a ".cerealrc.json" config file.
    #[arg(short = 'c', long)]
    config: Option<PathBuf>,

    /// How front matter is exposed: reacthelmet, variables or none.
    #[arg(long)]
    front_matter_mode: Option<String>,

    /// Name of the head context component.
    #[arg(long)]
    react_head_context_name: Option<String>,

    /// Name of the object holding front matter values.
    #[arg(long)]
    react_head_context_var_name: Option<String>,

    /// Module to import the head context from.
    #[arg(long)]
    react_head_context_import: Option<String>,

    /// Maximum number of worker threads.
    #[arg(short = 'j', long)]
    threads: Option<usize>,

    /// Log level: 1 = debug, 2 = default, 3 = no logs.
    #[arg(short = 'l', long, default_value_t = 2,
          value_parser = clap::value_parser!(u8).range(1..=3))]
    log_level: u8,
}

impl Cli {
    fn overrides(&self) -> OptionOverrides {
        OptionOverrides {
            front_matter_mode: self.front_matter_mode.clone(),
            react_head_context_name: self.react_head_context_name.clone(),
            react_head_context_var_name: self.react_head_context_var_name.clone(),
            react_head_context_import: self.react_head_context_import.clone(),
        }
    }
}

/// Contents of a `.cerealrc.json` file. Unknown keys are ignored.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileConfig {
    #[serde(default)]
    input_path: Option<PathBuf>,
    #[serde(default)]
    output_path: Option<PathBuf>,
    #[serde(default)]
    delete_existing_output_folder: Option<bool>,
    #[serde(flatten)]
    options: OptionOverrides,
}

fn load_config(path: &Path) -> Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("cannot read config file {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("invalid config file {}", path.display()))
}

/// Everything a run needs, after layering defaults, config file and flags.
#[derive(Debug)]
struct RunSettings {
    input_path: PathBuf,
    output_path: PathBuf,
    delete_existing_output_folder: bool,
    options: Options,
    threads: Option<usize>,
}

fn resolve_settings(cli: &Cli) -> Result<RunSettings> {
    let file = match &cli.config {
        Some(path) => load_config(path)?,
        None => FileConfig::default(),
    };

    let settings = RunSettings {
        input_path: cli
            .input_path
            .clone()
            .or(file.input_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_INPUT_PATH)),
        output_path: cli
            .output_path
            .clone()
            .or(file.output_path)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_PATH)),
        delete_existing_output_folder: cli.delete_existing_output_folder
            || file.delete_existing_output_folder.unwrap_or(false),
        options: Options::resolve([&file.options, &cli.overrides()]),
        threads: cli.threads,
    };
    log::debug!("parsed user options: {:?}", settings);
    Ok(settings)
}

/// Converts every source under the input path.
///
/// Only a missing input or an unusable output folder is an error. A file
/// that cannot be read, converted or written is logged and counted as
/// failed, and the rest of the run goes on.
fn run(settings: &RunSettings) -> Result<BatchStats> {
    let sources = files::collect_markdown_files(&settings.input_path)?;
    if sources.is_empty() {
        log::warn!(
            "No markdown files found in {}",
            settings.input_path.display()
        );
    }
    let total = sources.len();

    let (sources, collisions) = files::split_output_collisions(sources);
    for source in &collisions {
        log::warn!(
            "Skipping {}: another source already writes {}",
            source.path.display(),
            source.relative.with_extension("jsx").display()
        );
    }
    let mut failed = collisions.len();

    let mut readable = Vec::with_capacity(sources.len());
    let mut inputs = Vec::with_capacity(sources.len());
    for source in sources {
        match fs::read_to_string(&source.path) {
            Ok(text) => {
                inputs.push(BatchInput {
                    id: source.relative.display().to_string(),
                    source: text,
                    component_name: files::component_name(&source.relative),
                });
                readable.push(source);
            }
            Err(err) => {
                log::error!("Cannot read {}: {}", source.path.display(), err);
                failed += 1;
            }
        }
    }

    files::prepare_output_dir(
        &settings.output_path,
        settings.delete_existing_output_folder,
    )?;

    let transformer = Transformer::new(settings.options.clone())
        .with_instrumentation(Arc::new(LogInstrumentation));
    let result = transformer.transform_many(
        inputs,
        &BatchOptions {
            max_threads: settings.threads,
        },
    );

    failed += result.stats.failed as usize;

    for (source, item) in readable.iter().zip(&result.results) {
        let Some(code) = &item.code else {
            continue;
        };
        let target = files::output_path(&settings.output_path, &source.relative);
        match files::write_component(&target, code) {
            Ok(()) => log::debug!("Wrote {} as {}", target.display(), item.component_name),
            Err(err) => {
                log::error!("{:#}", err);
                failed += 1;
            }
        }
    }

    Ok(BatchStats {
        total: total as u32,
        succeeded: (total - failed) as u32,
        failed: failed as u32,
        processing_time_ms: result.stats.processing_time_ms,
    })
}

fn init_logging(log_level: u8) {
    let level = match log_level {
        1 => log::LevelFilter::Debug,
        3 => log::LevelFilter::Off,
        _ => log::LevelFilter::Info,
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level);
    log::debug!("cli args: {:?}", cli);

    match resolve_settings(&cli).and_then(|settings| run(&settings)) {
        Ok(stats) if stats.failed == 0 => ExitCode::SUCCESS,
        Ok(stats) => {
            log::error!(
                "{} of {} markdown files could not be converted",
                stats.failed,
                stats.total
            );
            ExitCode::from(2)
        }
        Err(err) => {
            eprintln!("cereal: {:#}", err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cereal_jsx::FrontMatterMode;
    use clap::CommandFactory;
    use tempfile::tempdir;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("cereal").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn defaults_apply_without_flags() {
        let settings = resolve_settings(&parse(&[])).unwrap();
        assert_eq!(settings.input_path, PathBuf::from("markdown"));
        assert_eq!(settings.output_path, PathBuf::from("jsxMarkdown"));
        assert!(!settings.delete_existing_output_folder);
        assert_eq!(settings.options, Options::default());
    }

    #[test]
    fn short_flags_and_del_alias() {
        let cli = parse(&["-i", "docs", "-o", "out", "--del", "-l", "1"]);
        assert_eq!(cli.input_path, Some(PathBuf::from("docs")));
        assert_eq!(cli.output_path, Some(PathBuf::from("out")));
        assert!(cli.delete_existing_output_folder);
        assert_eq!(cli.log_level, 1);
        assert!(Cli::try_parse_from(["cereal", "-l", "4"]).is_err());
    }

    #[test]
    fn flags_override_config_file() {
        let dir = tempdir().unwrap();
        let config = dir.path().join(".cerealrc.json");
        fs::write(
            &config,
            r#"{
                "inputPath": "from-file",
                "outputPath": "file-out",
                "deleteExistingOutputFolder": true,
                "frontMatterMode": "Variables",
                "reactHeadContextName": "FileHead",
                "logLevel": 1
            }"#,
        )
        .unwrap();
        let config_arg = config.to_string_lossy().into_owned();

        let settings = resolve_settings(&parse(&[
            "-c",
            &config_arg,
            "-o",
            "flag-out",
            "--react-head-context-name",
            "FlagHead",
        ]))
        .unwrap();
        assert_eq!(settings.input_path, PathBuf::from("from-file"));
        assert_eq!(settings.output_path, PathBuf::from("flag-out"));
        assert!(settings.delete_existing_output_folder);
        assert_eq!(settings.options.front_matter_mode, FrontMatterMode::Declarations);
        assert_eq!(settings.options.react_head_context_name, "FlagHead");
    }

    #[test]
    fn bad_config_file_is_fatal() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("broken.json");
        fs::write(&config, "{ not json").unwrap();
        let config_arg = config.to_string_lossy().into_owned();
        assert!(resolve_settings(&parse(&["-c", &config_arg])).is_err());
    }

    #[test]
    fn converts_a_folder() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("markdown");
        let output = dir.path().join("jsx");
        fs::create_dir_all(input.join("blog")).unwrap();
        fs::write(
            input.join("hello-world.md"),
            "---\ntitle: Hello\n---\n# Hi <span class=\"x\">there</span>\n",
        )
        .unwrap();
        fs::write(input.join("blog/first-post.md"), "Some *text*.\n").unwrap();
        fs::create_dir_all(&output).unwrap();
        fs::write(output.join("stale.jsx"), "old").unwrap();

        let settings = RunSettings {
            input_path: input,
            output_path: output.clone(),
            delete_existing_output_folder: true,
            options: Options::default(),
            threads: Some(1),
        };
        let stats = run(&settings).unwrap();
        assert_eq!((stats.total, stats.succeeded, stats.failed), (2, 2, 0));

        let hello = fs::read_to_string(output.join("hello-world.jsx")).unwrap();
        assert!(hello.contains("export default function HelloWorld()"));
        assert!(hello.contains("export const title = \"Hello\";"));
        assert!(hello.contains("<span className=\"x\">"));

        let post = fs::read_to_string(output.join("blog").join("first-post.jsx")).unwrap();
        assert!(post.contains("export default function FirstPost()"));
        assert!(post.contains("<p>Some <em>text</em>.</p>"));

        assert!(!output.join("stale.jsx").exists());
    }

    fn settings_for(input: PathBuf, output: PathBuf) -> RunSettings {
        RunSettings {
            input_path: input,
            output_path: output,
            delete_existing_output_folder: false,
            options: Options::default(),
            threads: Some(1),
        }
    }

    #[test]
    fn unreadable_file_does_not_stop_the_run() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("md");
        let output = dir.path().join("out");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("a.md"), "# A\n").unwrap();
        fs::write(input.join("b.md"), [0xFF_u8, 0xFE, 0x00]).unwrap();
        fs::write(input.join("c.md"), "# C\n").unwrap();

        let stats = run(&settings_for(input, output.clone())).unwrap();
        assert_eq!((stats.total, stats.succeeded, stats.failed), (3, 2, 1));
        assert!(output.join("a.jsx").exists());
        assert!(!output.join("b.jsx").exists());
        let c = fs::read_to_string(output.join("c.jsx")).unwrap();
        assert!(c.contains("export default function C()"));
    }

    #[test]
    fn colliding_outputs_keep_the_first_source() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("md");
        let output = dir.path().join("out");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("a.markdown"), "first\n").unwrap();
        fs::write(input.join("a.md"), "second\n").unwrap();

        let stats = run(&settings_for(input, output.clone())).unwrap();
        assert_eq!((stats.total, stats.succeeded, stats.failed), (2, 1, 1));
        let a = fs::read_to_string(output.join("a.jsx")).unwrap();
        assert!(a.contains("<p>first</p>"));
    }

    #[test]
    fn missing_input_folder_is_fatal() {
        let dir = tempdir().unwrap();
        let settings = RunSettings {
            input_path: dir.path().join("absent"),
            output_path: dir.path().join("out"),
            delete_existing_output_folder: false,
            options: Options::default(),
            threads: None,
        };
        assert!(run(&settings).is_err());
    }
}
