//! tdo task command implementations: add, lst, check/uncheck, show.

use std::path::PathBuf;
use std::str::FromStr;

use serde::Serialize;
use tracing::warn;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::project::{start_dir, Project};
use crate::query::{ListedTask, LoadedTasks, SortSpec};
use crate::store::TaskStore;
use crate::task::Status;
use crate::taskfile::{tags_as_set, ReadMode};

/// Timestamp format used in human listings.
const DISPLAY_TIME: &str = "%Y-%m-%d %H:%M";

pub struct AddOptions {
    pub text: Vec<String>,
    pub tags: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub limit: i64,
    pub orderby: Option<String>,
    pub withtags: Option<String>,
    pub status: String,
    pub verbose: bool,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct SetStatusOptions {
    pub task: String,
    pub status: Status,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub task: String,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

/// `--status` value for listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusFilter {
    Only(Status),
    All,
}

impl StatusFilter {
    fn statuses(self) -> Vec<Status> {
        match self {
            StatusFilter::Only(status) => vec![status],
            StatusFilter::All => vec![Status::Todo, Status::Done],
        }
    }
}

impl FromStr for StatusFilter {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse::<Status>()
            .map(StatusFilter::Only)
            .map_err(|_| Error::Parse(format!("invalid status '{}' (expected todo|done|all)", s.trim())))
    }
}

struct Context {
    store: TaskStore,
    config: Config,
}

fn load_context(dir: Option<PathBuf>) -> Result<Context> {
    let start = start_dir(dir)?;
    let project = Project::require(&start)?;
    if !project.is_initialized() {
        warn!(root = %project.root().display(), "todo/ or done/ missing; run `tdo init` to create them");
    }
    let config = Config::load_from_project(&project)?;
    Ok(Context {
        store: TaskStore::new(project),
        config,
    })
}

#[derive(Serialize)]
struct TaskGroup {
    status: Status,
    total: usize,
    tasks: LoadedTasks,
}

#[derive(Serialize)]
struct TaskListOutput {
    #[serde(skip_serializing_if = "Option::is_none")]
    orderby: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    withtags: Option<Vec<String>>,
    groups: Vec<TaskGroup>,
}

#[derive(Serialize)]
struct StatusChangeOutput {
    moved: bool,
    task: ListedTask,
}

pub fn run_add(options: AddOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let tags = options
        .tags
        .as_deref()
        .map(tags_as_set)
        .unwrap_or_default();
    let text = options.text.join(" ");
    let author = ctx.config.author();

    let task = ctx.store.add(author.as_deref(), &tags, &text)?;

    let mut human = HumanOutput::new(format!("Added #{}: {}", task.ordinal, task.title));
    human.push_summary("file", task.filename.clone());
    if !task.tags.is_empty() {
        human.push_summary("tags", task.tags.render());
    }
    if let Some(author) = task.author.as_deref() {
        human.push_summary("by", author);
    }
    human.push_next_step(format!("tdo check {}", task.filename));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "add",
        &task,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let filter: StatusFilter = options.status.parse()?;
    let order = options
        .orderby
        .as_deref()
        .map(SortSpec::from_str)
        .transpose()?;
    let tags = options.withtags.as_deref().map(tags_as_set);

    let mut tasks = ctx.store.tasks(ReadMode::MetadataOnly)?;
    if let Some(tags) = tags.as_ref() {
        tasks = tasks.with_tags(tags)?;
    }
    if let Some(order) = order {
        tasks = tasks.order_by(order);
    }
    let snapshot = tasks.load();

    let groups: Vec<TaskGroup> = filter
        .statuses()
        .into_iter()
        .map(|status| {
            let tasks = snapshot
                .set()
                .with_status(status)
                .limit(options.limit)
                .load();
            TaskGroup {
                status,
                total: tasks.len(),
                tasks,
            }
        })
        .collect();

    let mut human = HumanOutput::new(match ctx.config.projectname.as_deref() {
        Some(name) => format!("Tasks for {name}"),
        None => "Tasks".to_string(),
    });
    if let Some(order) = order {
        human.push_summary("Order", order.to_string());
    }
    if let Some(tags) = tags.as_ref() {
        human.push_summary("Tags", tags.render());
    }
    for group in &groups {
        human.push_section(group.status.label());
        for task in &group.tasks {
            human.push_detail(format_list_line(task, options.verbose));
        }
    }

    let output = TaskListOutput {
        orderby: order.map(|order| order.to_string()),
        withtags: tags.map(|tags| tags.iter().map(str::to_string).collect()),
        groups,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "lst",
        &output,
        Some(&human),
    )
}

pub fn run_set_status(options: SetStatusOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let found = ctx.store.resolve(&options.task, ReadMode::MetadataOnly)?;
    let change = ctx.store.change_status(&found, options.status)?;
    let task = &change.task;

    let verb = match options.status {
        Status::Done => "Checked",
        Status::Todo => "Unchecked",
    };
    let mut human = if change.moved {
        HumanOutput::new(format!("{verb} #{}: {}", task.ordinal, task.title))
    } else {
        let mut human = HumanOutput::new(format!("#{}: {}", task.ordinal, task.title));
        human.push_warning(format!("task is already {}", options.status));
        human
    };
    human.push_summary("file", task.filename.clone());
    human.push_summary("status", task.status.to_string());
    human.push_summary("ordinal", task.ordinal.to_string());
    human.push_warning("ordinals of other tasks may have changed; run `tdo lst` again");

    let command = match options.status {
        Status::Done => "check",
        Status::Todo => "uncheck",
    };
    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        command,
        &StatusChangeOutput {
            moved: change.moved,
            task: change.task.clone(),
        },
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = load_context(options.dir)?;
    let task = ctx.store.resolve(&options.task, ReadMode::Full)?;

    let mut human = HumanOutput::new(format!("#{}: {}", task.ordinal, task.title));
    human.push_summary("file", task.filename.clone());
    human.push_summary("status", task.status.to_string());
    if let Some(author) = task.author.as_deref() {
        human.push_summary("by", author);
    }
    if !task.tags.is_empty() {
        human.push_summary("tags", task.tags.render());
    }
    human.push_summary("created", task.created_at.format(DISPLAY_TIME).to_string());
    human.push_summary("modified", task.modified_at.format(DISPLAY_TIME).to_string());
    if let Some(content) = task.content.as_deref().filter(|c| !c.is_empty()) {
        human.push_section("Content");
        for line in content.lines() {
            human.push_detail(line);
        }
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "show",
        &task,
        Some(&human),
    )
}

fn format_list_line(task: &ListedTask, verbose: bool) -> String {
    let mut line = format!("{:>3}. {}", task.ordinal, task.title);
    if !task.tags.is_empty() {
        line.push(' ');
        for tag in task.tags.iter() {
            line.push_str(&format!("[{tag}]"));
        }
    }
    line.push_str(&format!(
        " (modified {})",
        task.modified_at.format(DISPLAY_TIME)
    ));
    if verbose {
        if let Some(author) = task.author.as_deref() {
            line.push_str(&format!(" by {author}"));
        }
        line.push_str(&format!(" [{}]", task.filename));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_filter_parses_all_and_single() {
        assert_eq!("all".parse::<StatusFilter>().unwrap(), StatusFilter::All);
        assert_eq!(
            "Done".parse::<StatusFilter>().unwrap(),
            StatusFilter::Only(Status::Done)
        );
        assert_eq!(
            StatusFilter::All.statuses(),
            vec![Status::Todo, Status::Done]
        );
        assert!(matches!(
            "later".parse::<StatusFilter>(),
            Err(Error::Parse(_))
        ));
    }
}
