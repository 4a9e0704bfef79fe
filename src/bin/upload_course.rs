use std::env;
use std::path::PathBuf;

use anyhow::{bail, Context};
use praktik::api::HttpCourseApi;
use praktik::config::Config as Settings;
use praktik::navigation::Navigator;
use praktik::workflow::{CourseAiCreateView, CourseUploadView};

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const USAGE: &str = "Usage: upload_course [--ai] [--category N] [--modules N] <title> <file>...";

pub struct Config {
    pub title: String,
    pub files: Vec<PathBuf>,
    pub ai: bool,
    pub category_id: Option<i64>,
    pub module_count: Option<u32>,
}

fn parse_config(mut args: impl Iterator<Item = String>) -> anyhow::Result<Config> {
    let mut ai = false;
    let mut category_id = None;
    let mut module_count = None;
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--ai" => ai = true,
            "--category" => {
                let value = args.next().context("--category needs a category id")?;
                category_id = Some(value.parse().context("category id must be a number")?);
            }
            "--modules" => {
                let value = args.next().context("--modules needs a count")?;
                module_count = Some(value.parse().context("module count must be a number")?);
            }
            _ => positional.push(arg),
        }
    }

    let mut positional = positional.into_iter();
    let title = positional.next().context("course title is required")?;
    let files: Vec<PathBuf> = positional.map(PathBuf::from).collect();
    if files.is_empty() {
        bail!("at least one source file is required");
    }
    if !ai && files.len() > 1 {
        bail!("manual upload takes exactly one file, use --ai for several");
    }

    Ok(Config {
        title,
        files,
        ai,
        category_id,
        module_count,
    })
}

fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env().context("invalid configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(
            settings.log_level.to_string(),
        ))
        .with_writer(std::io::stderr)
        .init();

    let config = match parse_config(env::args().skip(1)) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", USAGE);
            return Err(e);
        }
    };

    let api = HttpCourseApi::new(&settings.api_url);
    let mut nav = Navigator::new(&settings.admin_path);

    let course_id = if config.ai {
        let mut view = CourseAiCreateView::load(&api);
        view.title = config.title.clone();
        if let Some(category_id) = config.category_id {
            view.select_category(category_id);
            if view.category_id() != Some(category_id) {
                bail!("unknown category {}", category_id);
            }
        }
        if let Some(count) = config.module_count {
            view.set_module_count(count);
        }
        if view.add_files(config.files.iter().cloned()) < config.files.len() {
            bail!("some files have an unsupported type");
        }
        view.submit(&api, &mut nav)
            .with_context(|| format!("could not generate course {}", config.title))?
    } else {
        let mut view = CourseUploadView::new();
        view.title = config.title.clone();
        view.select_file(config.files[0].clone())
            .context("unsupported source file")?;
        view.submit(&api, &mut nav)
            .with_context(|| format!("could not create course {}", config.title))?
    };

    println!(
        "created course {BOLD}{}{RESET} (id {BOLD}{}{RESET})",
        config.title, course_id
    );
    println!("continue at {}", nav.current_url());

    Ok(())
}
