//! tdo init command implementation
//!
//! Creates `TASKS/` with its `todo/`, `done/` and `.config` in the start
//! directory. Non-interactive: config values come from flags or defaults.

use std::path::PathBuf;

use crate::config::Config;
use crate::error::Result;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::project::{start_dir, Project, TASKS_DIR};

pub struct InitOptions {
    pub username: Option<String>,
    pub email: Option<String>,
    pub projectname: Option<String>,
    pub dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(serde::Serialize)]
struct InitReport {
    root: PathBuf,
    created: InitCreated,
    config: Config,
}

#[derive(serde::Serialize)]
struct InitCreated {
    todo: bool,
    done: bool,
    config: bool,
}

pub fn run(options: InitOptions) -> Result<()> {
    let start = start_dir(options.dir)?;

    let outer = Project::discover(&start);
    let project = Project::new(start.join(TASKS_DIR));

    let created_dirs = project.init_dirs()?;
    let created_todo = created_dirs.contains(&project.todo_dir());
    let created_done = created_dirs.contains(&project.done_dir());

    let config_path = project.config_file();
    let had_config = config_path.exists();
    let existing = Config::load_from_project(&project)?;
    let overrides_given =
        options.username.is_some() || options.email.is_some() || options.projectname.is_some();

    let mut config = if had_config {
        existing.clone()
    } else {
        existing.clone().with_defaults(&project)
    };
    if let Some(username) = options.username {
        config.username = Some(username);
    }
    if let Some(email) = options.email {
        config.email = Some(email);
    }
    if let Some(projectname) = options.projectname {
        config.projectname = Some(projectname);
    }
    let write_config = !had_config || (overrides_given && config != existing);
    if write_config {
        config.save(&config_path)?;
    }

    let report = InitReport {
        root: project.root().to_path_buf(),
        created: InitCreated {
            todo: created_todo,
            done: created_done,
            config: write_config,
        },
        config: config.clone(),
    };

    let mut created_items = Vec::new();
    if created_todo {
        created_items.push("TASKS/todo/");
    }
    if created_done {
        created_items.push("TASKS/done/");
    }
    if write_config {
        created_items.push("TASKS/.config");
    }

    let header = if created_items.is_empty() {
        "tdo init: nothing to do".to_string()
    } else {
        "tdo init: initialized project".to_string()
    };

    let mut human = HumanOutput::new(header);
    human.push_summary("root", project.root().display().to_string());
    human.push_summary(
        "written",
        if created_items.is_empty() {
            "none".to_string()
        } else {
            created_items.join(", ")
        },
    );
    if let Some(name) = config.projectname.as_deref() {
        human.push_summary("project", name);
    }
    if let Some(author) = config.author() {
        human.push_summary("author", author);
    }
    if let Some(outer) = outer.filter(|outer| outer.root() != project.root()) {
        human.push_warning(format!(
            "a parent project exists at {}; commands run here now use this one",
            outer.root().display()
        ));
    }
    human.push_next_step("tdo add <text> --tags <tags>");
    human.push_next_step("commit TASKS/ to version control");

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "init",
        &report,
        Some(&human),
    )?;

    Ok(())
}
