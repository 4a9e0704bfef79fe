use std::env;

use anyhow::{Context, Result};
use praktik::api::HttpCourseApi;
use praktik::catalog::{active_modules, resolve_course};
use praktik::config::Config;
use praktik::navigation::{route, Navigator};
use praktik::storage::YamlFileStore;
use praktik::workflow::{open_view, AdminScreen};
use tracing::info;

const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";
const USAGE: &str = "Usage: praktik <admin-url-or-query> | praktik course <slug-or-id>";

enum Command {
    Admin(String),
    Course(String),
}

fn parse_command(mut args: impl Iterator<Item = String>) -> Result<Command> {
    let first = args.next().context("an admin URL or `course <slug>` is required")?;
    if first == "course" {
        let segment = args.next().context("course slug or id is required")?;
        return Ok(Command::Course(segment));
    }
    Ok(Command::Admin(first))
}

/// Accepts a full URL, a path with a query or a bare query string.
fn query_of(input: &str) -> &str {
    match input.split_once('?') {
        Some((_, query)) => query,
        None if input.contains('=') => input,
        None => "",
    }
}

fn main() -> Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with_writer(std::io::stderr)
        .init();

    let command = match parse_command(env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", USAGE);
            return Err(e);
        }
    };

    let api = HttpCourseApi::new(&config.api_url);
    info!(api = api.base_url(), "using backend");

    match command {
        Command::Course(segment) => show_course(&api, &segment),
        Command::Admin(input) => {
            let query = query_of(&input);
            let url = if query.is_empty() {
                config.admin_path.clone()
            } else {
                format!("{}?{}", config.admin_path, query)
            };
            let nav = Navigator::at(&config.admin_path, &url);
            let target = route(&nav.state());
            info!(?target, "routing");

            let mut store = YamlFileStore::open(&config.storage_path);
            let screen = open_view(&api, &mut store, target)
                .with_context(|| format!("could not open {}", nav.current_url()))?;
            describe(&screen);
            Ok(())
        }
    }
}

fn show_course(api: &HttpCourseApi, segment: &str) -> Result<()> {
    let course = resolve_course(api, segment)
        .with_context(|| format!("could not find course {}", segment))?;

    println!("{BOLD}{}{RESET}", course.title);
    if let Some(description) = &course.description {
        println!("{}", description);
    }
    println!();
    for (idx, module) in active_modules(&course).iter().enumerate() {
        println!("{:>3}. {}", idx + 1, module.title);
    }
    Ok(())
}

fn describe(screen: &AdminScreen) {
    match screen {
        AdminScreen::CoursesList(view) => {
            if let Some(error) = view.error() {
                println!("{}", error);
            }
            for course in view.courses() {
                let state = if course.is_published { "publikováno" } else { "koncept" };
                println!(
                    "{BOLD}{:>5}{RESET}  {}  [{}]  {} modulů",
                    course.course_id,
                    course.title,
                    state,
                    course.modules.len()
                );
                if let Some(modules) = view.modules(course.course_id) {
                    for module in modules {
                        println!("         - {}", module.title);
                    }
                }
            }
        }
        AdminScreen::CourseContent(view) => {
            println!("{BOLD}{}{RESET}: obsah", view.course_title);
            let contents = view.drafts.contents_in_order();
            for (module, content) in view.drafts.modules().iter().zip(contents) {
                let size = content.map_or(0, |c| c.content.len());
                println!("{:>3}. {} ({} znaků)", module.position, module.title, size);
            }
        }
        AdminScreen::CourseTests(view) => {
            println!("{BOLD}{}{RESET}: testy", view.course_title);
            for (idx, module) in view.drafts.modules().iter().enumerate() {
                println!(
                    "{:>3}. {} ({} otázek)",
                    idx + 1,
                    module.title,
                    view.drafts.questions_at(idx).len()
                );
            }
        }
        AdminScreen::CourseSummary(view) => {
            println!("{BOLD}{}{RESET}", view.title);
            println!("{}", view.description);
            println!(
                "{} modulů, {} otázek",
                view.module_count(),
                view.total_questions()
            );
        }
        AdminScreen::CourseEdit(view) => {
            println!("{BOLD}{}{RESET}: úprava kurzu", view.title);
            for module in view.modules() {
                println!("  - {}", module.title);
            }
        }
        AdminScreen::CourseUpload(_) => {
            println!("Nahrání kurzu: použijte `upload_course <název> <soubor>`");
        }
        AdminScreen::CourseAiCreate(view) => {
            println!("Vytvoření kurzu s AI, kategorie:");
            for category in view.categories() {
                println!("{:>5}  {}", category.category_id, category.name);
            }
        }
        AdminScreen::ModuleEdit(view) => {
            println!(
                "{BOLD}{}{RESET}: modul na pozici {}",
                view.title, view.position
            );
        }
    }
}
