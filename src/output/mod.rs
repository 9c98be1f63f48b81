//! SQF arsenal artifacts rendered from deduplicated class lists

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Utc};
use log::info;
use minijinja::{Environment, context};

use crate::aggregate::{self, LoadFailure};
use crate::utils::{list_subdirectories, write_atomic};

/// Name of the preset combining every unit
pub const ALL_UNITS: &str = "all";

const INIT_TEMPLATE: &str = r#""Type: {{ unit }} | Last Updated: {{ date }}";
[this, false] call ace_dragging_fnc_setDraggable;
[this, false] call ace_dragging_fnc_setCarryable;
[this,
  {{ items }}
] call ace_arsenal_fnc_initBox;
"#;

const EXEC_TEMPLATE: &str = r#""Type: {{ unit }} | Last Updated: {{ date }}";
params ["_Arsenal"];
[_Arsenal, false] call ace_dragging_fnc_setDraggable;
[_Arsenal, false] call ace_dragging_fnc_setCarryable;
[_Arsenal,
  {{ items }}
] call ace_arsenal_fnc_initBox;"#;

/// `YYYY-MM-DD` in UTC
pub fn format_date(now: DateTime<Utc>) -> String {
    now.format("%Y-%m-%d").to_string()
}

pub fn today() -> String {
    format_date(Utc::now())
}

/// Files written for one preset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArsenalArtifacts {
    pub init_path: PathBuf,
    pub exec_path: PathBuf,
}

/// Summary of one generated preset
#[derive(Debug, Clone)]
pub struct PresetReport {
    pub unit: String,
    /// Values written after deduplication
    pub items: usize,
    /// Each repeat of an earlier input value in input order; empty when not checked
    pub duplicates: Vec<String>,
    pub failures: Vec<LoadFailure>,
    pub artifacts: ArsenalArtifacts,
}

/// Renders and writes arsenal box scripts into an output directory
pub struct ArsenalWriter {
    env: Environment<'static>,
    out_dir: PathBuf,
    date: String,
}

impl ArsenalWriter {
    pub fn new(out_dir: impl Into<PathBuf>, date: impl Into<String>) -> Result<Self> {
        Ok(Self {
            env: default_environment()?,
            out_dir: out_dir.into(),
            date: date.into(),
        })
    }

    fn render(&self, template_name: &str, unit: &str, values: &[String]) -> Result<String> {
        let items = serde_json::to_string(values)?;
        self.env
            .get_template(template_name)
            .and_then(|template| template.render(context! { unit, date => &self.date, items }))
            .map_err(|err| anyhow!("failed to render template '{template_name}': {err}"))
    }

    /// Script placed in an object's init field
    pub fn render_init(&self, unit: &str, values: &[String]) -> Result<String> {
        self.render("init", unit, values)
    }

    /// Script executed with the arsenal object as its parameter
    pub fn render_exec(&self, unit: &str, values: &[String]) -> Result<String> {
        self.render("exec", unit, values)
    }

    /// Write `init_arsenal_<unit>.sqf` and `arsenal_<unit>.sqf`
    pub fn write(&self, unit: &str, values: &[String]) -> Result<ArsenalArtifacts> {
        let artifacts = ArsenalArtifacts {
            init_path: self.out_dir.join(format!("init_arsenal_{unit}.sqf")),
            exec_path: self.out_dir.join(format!("arsenal_{unit}.sqf")),
        };

        write_atomic(&artifacts.init_path, &self.render_init(unit, values)?)?;
        info!("Data written to file: {}", artifacts.init_path.display());
        write_atomic(&artifacts.exec_path, &self.render_exec(unit, values)?)?;
        info!("Data written to file: {}", artifacts.exec_path.display());

        Ok(artifacts)
    }

    /// Build the preset for the unit folder `data_dir/<unit>`
    pub fn generate_unit(&self, data_dir: &Path, unit: &str, check: bool) -> Result<PresetReport> {
        let unit_dir = data_dir.join(unit);
        let combined = aggregate::load_and_combine(&unit_dir)
            .with_context(|| format!("Failed to load unit data for {unit}"))?;

        let duplicates = if check {
            aggregate::repeated_occurrences(&combined.values)
        } else {
            Vec::new()
        };
        let values = aggregate::dedupe_and_sort(combined.values);
        let artifacts = self.write(unit, &values)?;

        Ok(PresetReport {
            unit: unit.to_string(),
            items: values.len(),
            duplicates,
            failures: combined.failures,
            artifacts,
        })
    }

    /// Build one preset per unit folder, then the combined preset
    pub fn generate_all(&self, data_dir: &Path, check: bool) -> Result<Vec<PresetReport>> {
        let mut reports = Vec::new();
        for unit_dir in list_subdirectories(data_dir)? {
            let Some(name) = unit_dir.file_name() else {
                continue;
            };
            let unit = name.to_string_lossy().into_owned();
            info!("=== Processing unit: {} ===", unit);
            reports.push(self.generate_unit(data_dir, &unit, check)?);
        }

        info!("=== Processing all units combined ===");
        let combined = aggregate::load_all_units_data(data_dir)?;
        let values = aggregate::dedupe_and_sort(combined.values);
        let artifacts = self.write(ALL_UNITS, &values)?;
        reports.push(PresetReport {
            unit: ALL_UNITS.to_string(),
            items: values.len(),
            duplicates: Vec::new(),
            failures: combined.failures,
            artifacts,
        });

        Ok(reports)
    }
}

fn default_environment() -> Result<Environment<'static>> {
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    env.add_template("init", INIT_TEMPLATE)
        .map_err(|err| anyhow!("failed to register init template: {err}"))?;
    env.add_template("exec", EXEC_TEMPLATE)
        .map_err(|err| anyhow!("failed to register exec template: {err}"))?;
    Ok(env)
}
