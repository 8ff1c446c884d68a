//! Project Repair
//!
//! Turns an arbitrary JSON document into a canonical [`Project`] plus a list
//! of human-readable warnings describing every correction. Only two things
//! are fatal: a root that is not an object and an unsupported schema
//! version. Everything else is repaired.
//!
//! Repair is deterministic and idempotent: feeding a repaired project back
//! in produces no warnings and an identical value.

use std::collections::{BTreeMap, HashSet};

use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::error::{FormMapError, Result};
use crate::model::curve::compare_points;
use crate::model::palette::Palette;
use crate::model::project::{placeholder_section, Project, SUPPORTED_SCHEMA_VERSION};
use crate::model::sections::{compare_sections, lay_out, LayoutAdjustment};
use crate::model::types::{
    CurvePoint, EnergyCurve, Section, TempoModel, TimeSignature, TimebaseView, Transition,
    TransitionType, DEFAULT_BPM, DEFAULT_TIME_SIG,
};
use crate::model::values::{
    clamp, clamp_param, is_time_in_range, nudge_after, MAX_TIME_SEC, MIN_SECTION_SEC,
};
use crate::state::config::RepairConfig;

/// Top-level keys owned by [`Project`]; anything else is carried in `extra`.
const KNOWN_FIELDS: [&str; 8] = [
    "schemaVersion",
    "title",
    "composerOrArtist",
    "projectNotes",
    "timebaseView",
    "tempoModel",
    "sections",
    "energyCurve",
];

/// A repaired project and the corrections made to it.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairReport {
    pub project: Project,
    pub warnings: Vec<String>,
}

impl RepairReport {
    /// True when the input was already canonical.
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// A repaired part of a project and the corrections made to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Repaired<T> {
    pub value: T,
    pub warnings: Vec<String>,
}

/// Repair with the default configuration.
pub fn repair_project(raw: &Value) -> Result<RepairReport> {
    repair_project_with(raw, &RepairConfig::default())
}

/// Repair `raw` into a canonical project.
///
/// Fails with [`FormMapError::InvalidProjectStructure`] when the root is
/// not an object and [`FormMapError::UnsupportedSchemaVersion`] when
/// `schemaVersion` is anything but the supported version.
pub fn repair_project_with(raw: &Value, config: &RepairConfig) -> Result<RepairReport> {
    let Some(doc) = raw.as_object() else {
        return Err(FormMapError::InvalidProjectStructure {
            reason: format!("expected a JSON object at the root, found {}", json_kind(raw)),
        });
    };
    check_schema_version(doc.get("schemaVersion"))?;

    let mut warnings = Vec::new();

    let title = text_field(doc.get("title"), "title", config.title(), &mut warnings);
    let composer_or_artist =
        text_field(doc.get("composerOrArtist"), "composerOrArtist", "", &mut warnings);
    let project_notes = text_field(doc.get("projectNotes"), "projectNotes", "", &mut warnings);

    let timebase_view = match doc
        .get("timebaseView")
        .and_then(Value::as_str)
        .map(str::parse::<TimebaseView>)
    {
        Some(Ok(view)) => view,
        _ => {
            warnings.push("timebaseView was invalid and reset to time.".to_string());
            TimebaseView::Time
        }
    };

    let tempo = repair_tempo_model(doc.get("tempoModel"));
    warnings.extend(tempo.warnings);

    let raw_sections: &[Value] = match doc.get("sections") {
        Some(Value::Array(items)) => items.as_slice(),
        None | Some(Value::Null) => &[],
        Some(_) => {
            warnings.push("sections was not a list and was ignored.".to_string());
            &[]
        }
    };
    let sections = repair_sections(raw_sections, &config.palette);
    warnings.extend(sections.warnings);

    let curve = repair_energy_curve(doc.get("energyCurve"), config);
    warnings.extend(curve.warnings);

    let extra: BTreeMap<String, Value> = doc
        .iter()
        .filter(|(key, _)| !KNOWN_FIELDS.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    let project = Project {
        schema_version: SUPPORTED_SCHEMA_VERSION,
        title,
        composer_or_artist,
        project_notes,
        timebase_view,
        tempo_model: tempo.value,
        sections: sections.value,
        energy_curve: curve.value,
        extra,
    };

    for warning in &warnings {
        debug!(%warning, "repair");
    }
    info!(
        title = %project.title,
        sections = project.sections.len(),
        points = project.energy_curve.points.len(),
        warnings = warnings.len(),
        "repaired project"
    );

    Ok(RepairReport { project, warnings })
}

fn check_schema_version(value: Option<&Value>) -> Result<()> {
    match value.and_then(Value::as_f64) {
        Some(version) if version == f64::from(SUPPORTED_SCHEMA_VERSION) => Ok(()),
        _ => Err(FormMapError::UnsupportedSchemaVersion {
            found: value.map_or_else(|| "missing".to_string(), Value::to_string),
            supported: SUPPORTED_SCHEMA_VERSION,
        }),
    }
}

/// Repair a tempo model. Each field is checked on its own, so a valid
/// `bpm` survives next to a broken time signature.
pub fn repair_tempo_model(raw: Option<&Value>) -> Repaired<TempoModel> {
    let mut warnings = Vec::new();
    let Some(tempo) = raw.and_then(Value::as_object) else {
        warnings.push("tempoModel missing; defaulting to 120 bpm 4/4.".to_string());
        return Repaired {
            value: TempoModel::default(),
            warnings,
        };
    };

    let enabled = match tempo.get("enabled") {
        Some(Value::Bool(enabled)) => *enabled,
        _ => {
            warnings.push("tempoModel.enabled was invalid; defaulting to true.".to_string());
            true
        }
    };
    let bpm = tempo_component(tempo.get("bpm"), "tempoModel.bpm", DEFAULT_BPM, &mut warnings);

    let time_sig = tempo.get("timeSig").and_then(Value::as_object);
    let numerator = tempo_component(
        time_sig.and_then(|sig| sig.get("numerator")),
        "tempoModel.timeSig.numerator",
        DEFAULT_TIME_SIG.0,
        &mut warnings,
    );
    let denominator = tempo_component(
        time_sig.and_then(|sig| sig.get("denominator")),
        "tempoModel.timeSig.denominator",
        DEFAULT_TIME_SIG.1,
        &mut warnings,
    );

    Repaired {
        value: TempoModel {
            enabled,
            bpm,
            time_sig: TimeSignature {
                numerator,
                denominator,
            },
        },
        warnings,
    }
}

fn tempo_component(
    value: Option<&Value>,
    label: &str,
    default: f64,
    warnings: &mut Vec<String>,
) -> f64 {
    match finite_number(value) {
        Some(v) if TempoModel::is_valid_component(v) => v,
        _ => {
            warnings.push(format!("{label} was invalid; defaulting to {default}."));
            default
        }
    }
}

/// Repair a raw section list into a gapless timeline.
///
/// Entries without numeric bounds are dropped, missing fields are filled
/// from the entry's position among the survivors, duplicate ids are
/// suffixed, and the result is sorted and laid out end to end. Bounds are
/// clamped into `±MAX_TIME_SEC` first, and the laid-out timeline is cut off
/// at `MAX_TIME_SEC`. An empty result gets a single placeholder section.
pub fn repair_sections(input: &[Value], palette: &Palette) -> Repaired<Vec<Section>> {
    let mut warnings = Vec::new();

    let bounded: Vec<(&Map<String, Value>, f64, f64)> = input
        .iter()
        .filter_map(|item| {
            let entry = item.as_object()?;
            let start_sec = finite_number(entry.get("startSec"))?;
            let end_sec = finite_number(entry.get("endSec"))?;
            Some((entry, start_sec, end_sec))
        })
        .collect();

    let dropped = input.len() - bounded.len();
    if dropped > 0 {
        warnings.push(format!(
            "Dropped {dropped} section(s) with missing or invalid time bounds."
        ));
    }

    let mut seen = HashSet::new();
    let mut sanitized = Vec::with_capacity(bounded.len());
    for (index, (entry, start_sec, end_sec)) in bounded.into_iter().enumerate() {
        let position = index + 1;

        let id = match non_empty_text(entry.get("id")) {
            Some(id) => id.to_string(),
            None => {
                let id = format!("sec-{position}");
                warnings.push(format!("Section {position} had no id; assigned \"{id}\"."));
                id
            }
        };
        let id = claim_unique_id(id, &mut seen, "Section", &mut warnings);

        let name = match non_empty_text(entry.get("name")) {
            Some(name) => name.to_string(),
            None => {
                let name = format!("Section {position}");
                warnings.push(format!("Section \"{id}\" had no name; named it \"{name}\"."));
                name
            }
        };

        let color_id = match non_empty_text(entry.get("colorId")) {
            Some(color_id) => color_id.to_string(),
            None => {
                let color_id = palette.default_color_id().to_string();
                warnings.push(format!(
                    "Section \"{name}\" had no colorId; using \"{color_id}\"."
                ));
                color_id
            }
        };

        let notes = match entry.get("notes") {
            Some(Value::String(notes)) => notes.clone(),
            None | Some(Value::Null) => String::new(),
            Some(_) => {
                warnings.push(format!("Section \"{name}\" notes were not text and were cleared."));
                String::new()
            }
        };

        let tags = match entry.get("tags") {
            Some(Value::Array(items)) => {
                if items.iter().any(|tag| !tag.is_string()) {
                    warnings.push(format!("Section \"{name}\" tags were converted to text."));
                }
                items.iter().map(value_to_text).collect()
            }
            None | Some(Value::Null) => Vec::new(),
            Some(_) => {
                warnings.push(format!("Section \"{name}\" tags were not a list and were cleared."));
                Vec::new()
            }
        };

        let (start_sec, end_sec) = if is_time_in_range(start_sec) && is_time_in_range(end_sec) {
            (start_sec, end_sec)
        } else {
            warnings.push(format!(
                "Section \"{name}\" time bounds clamped to within ±{MAX_TIME_SEC} s."
            ));
            (
                clamp(start_sec, -MAX_TIME_SEC, MAX_TIME_SEC),
                clamp(end_sec, -MAX_TIME_SEC, MAX_TIME_SEC),
            )
        };

        sanitized.push(Section {
            id,
            name,
            color_id,
            start_sec,
            end_sec,
            notes,
            tags,
        });
    }

    sanitized.sort_by(compare_sections);
    let (mut sections, adjustments) = lay_out(sanitized);
    for adjustment in adjustments {
        warnings.push(match adjustment {
            LayoutAdjustment::MinimumDuration { index } => format!(
                "Adjusted section \"{}\" to minimum duration.",
                sections[index].name
            ),
            LayoutAdjustment::Repositioned { index } => format!(
                "Repaired section \"{}\" to enforce gapless ordering.",
                sections[index].name
            ),
        });
    }

    let fitting = sections
        .iter()
        .take_while(|s| MAX_TIME_SEC - s.start_sec >= MIN_SECTION_SEC)
        .count();
    if fitting < sections.len() {
        warnings.push(format!(
            "Dropped {} section(s) starting past the {MAX_TIME_SEC} s limit.",
            sections.len() - fitting
        ));
        sections.truncate(fitting);
    }
    if let Some(last) = sections.last_mut() {
        if last.end_sec > MAX_TIME_SEC {
            last.end_sec = MAX_TIME_SEC;
            warnings.push(format!(
                "Section \"{}\" trimmed to end at the {MAX_TIME_SEC} s limit.",
                last.name
            ));
        }
    }

    if sections.is_empty() {
        warnings.push("No valid sections found; inserted placeholder section.".to_string());
        sections.push(placeholder_section(palette.default_color_id()));
    }

    Repaired {
        value: sections,
        warnings,
    }
}

/// Repair the energy curve: value range, band labels, then points.
pub fn repair_energy_curve(raw: Option<&Value>, config: &RepairConfig) -> Repaired<EnergyCurve> {
    let mut warnings = Vec::new();
    let Some(curve) = raw.and_then(Value::as_object) else {
        warnings.push("energyCurve missing; using default range and bands.".to_string());
        return Repaired {
            value: EnergyCurve {
                y_bands: config.y_bands(),
                ..EnergyCurve::default()
            },
            warnings,
        };
    };

    let y_min = range_bound(curve.get("yMin"), "energyCurve.yMin", 0.0, &mut warnings);
    let y_max = range_bound(curve.get("yMax"), "energyCurve.yMax", 1.0, &mut warnings);
    let (y_min, y_max) = if y_max > y_min {
        (y_min, y_max)
    } else {
        warnings.push("energyCurve yMin/yMax invalid; reset to 0..1.".to_string());
        (0.0, 1.0)
    };

    let y_bands = match curve.get("yBands") {
        Some(Value::Array(items)) if !items.is_empty() => {
            if items.iter().any(|band| !band.is_string()) {
                warnings.push("energyCurve.yBands entries were converted to text.".to_string());
            }
            items.iter().map(value_to_text).collect()
        }
        _ => {
            let bands = config.y_bands();
            warnings.push(format!(
                "energyCurve.yBands missing; defaulted to {}.",
                bands.join("/")
            ));
            bands
        }
    };

    let raw_points: &[Value] = match curve.get("points") {
        Some(Value::Array(items)) => items.as_slice(),
        None | Some(Value::Null) => &[],
        Some(_) => {
            warnings.push("energyCurve.points was not a list and was ignored.".to_string());
            &[]
        }
    };
    let points = repair_curve_points(raw_points, y_min, y_max);
    warnings.extend(points.warnings);

    Repaired {
        value: EnergyCurve {
            y_bands,
            y_min,
            y_max,
            points: points.value,
        },
        warnings,
    }
}

fn range_bound(value: Option<&Value>, label: &str, default: f64, warnings: &mut Vec<String>) -> f64 {
    match value {
        None | Some(Value::Null) => default,
        Some(present) => finite_number(Some(present)).unwrap_or_else(|| {
            warnings.push(format!("{label} was invalid; defaulting to {default}."));
            default
        }),
    }
}

/// Repair raw curve points against the range `[y_min, y_max]`.
///
/// Points are sorted by `(sec, id)` and walked once: times are clamped into
/// `[0, MAX_TIME_SEC]`, collisions are pushed just past the previous point,
/// and `param` and `y` are clamped. A collision with no room left before
/// `MAX_TIME_SEC` drops the later point.
pub fn repair_curve_points(input: &[Value], y_min: f64, y_max: f64) -> Repaired<Vec<CurvePoint>> {
    let mut warnings = Vec::new();

    let positioned: Vec<(&Map<String, Value>, f64)> = input
        .iter()
        .filter_map(|item| {
            let entry = item.as_object()?;
            Some((entry, finite_number(entry.get("sec"))?))
        })
        .collect();

    let dropped = input.len() - positioned.len();
    if dropped > 0 {
        warnings.push(format!(
            "Dropped {dropped} curve point(s) with invalid positions."
        ));
    }

    let mut seen = HashSet::new();
    let mut sanitized = Vec::with_capacity(positioned.len());
    for (index, (entry, sec)) in positioned.into_iter().enumerate() {
        let position = index + 1;

        let id = match non_empty_text(entry.get("id")) {
            Some(id) => id.to_string(),
            None => {
                let id = format!("pt-{position}");
                warnings.push(format!("Curve point {position} had no id; assigned \"{id}\"."));
                id
            }
        };
        let id = claim_unique_id(id, &mut seen, "Curve point", &mut warnings);

        let y = finite_number(entry.get("y")).unwrap_or_else(|| {
            warnings.push(format!("Curve point \"{id}\" y was invalid; defaulting to 0."));
            0.0
        });

        let transition = entry.get("rightTransition").and_then(Value::as_object);
        let kind = match transition
            .and_then(|t| t.get("type"))
            .and_then(Value::as_str)
            .map(str::parse::<TransitionType>)
        {
            Some(Ok(kind)) => kind,
            _ => {
                warnings.push(format!(
                    "Curve point \"{id}\" transition type was invalid; defaulting to linear."
                ));
                TransitionType::Linear
            }
        };
        let param = finite_number(transition.and_then(|t| t.get("param"))).unwrap_or_else(|| {
            warnings.push(format!(
                "Curve point \"{id}\" transition param was invalid; defaulting to 0."
            ));
            0.0
        });

        sanitized.push(CurvePoint {
            id,
            sec,
            y,
            right_transition: Transition::new(kind, param),
        });
    }

    sanitized.sort_by(compare_points);

    let mut resolved = Vec::with_capacity(sanitized.len());
    let mut last_sec = f64::NEG_INFINITY;
    for mut point in sanitized {
        if point.sec < 0.0 {
            point.sec = 0.0;
            warnings.push(format!("Curve point \"{}\" clamped to sec >= 0.", point.id));
        }
        if point.sec > MAX_TIME_SEC {
            point.sec = MAX_TIME_SEC;
            warnings.push(format!(
                "Curve point \"{}\" clamped to sec <= {MAX_TIME_SEC}.",
                point.id
            ));
        }
        if point.sec <= last_sec {
            let nudged = nudge_after(last_sec);
            if nudged > MAX_TIME_SEC {
                warnings.push(format!(
                    "Curve point \"{}\" dropped; no room left before the {MAX_TIME_SEC} s limit.",
                    point.id
                ));
                continue;
            }
            point.sec = nudged;
            warnings.push(format!(
                "Curve point \"{}\" shifted to resolve time tie/overlap.",
                point.id
            ));
        }
        last_sec = point.sec;

        let param = clamp_param(point.right_transition.param);
        if param != point.right_transition.param {
            point.right_transition.param = param;
            warnings.push(format!(
                "Curve point \"{}\" transition param clamped to [-1,1].",
                point.id
            ));
        }

        let y = clamp(point.y, y_min, y_max);
        if y != point.y {
            point.y = y;
            warnings.push(format!(
                "Curve point \"{}\" y clamped to within yMin/yMax.",
                point.id
            ));
        }
        resolved.push(point);
    }

    Repaired {
        value: resolved,
        warnings,
    }
}

/// Keep `id` if unused, otherwise the first free `id-2`, `id-3`, ...
fn claim_unique_id(
    id: String,
    seen: &mut HashSet<String>,
    entity: &str,
    warnings: &mut Vec<String>,
) -> String {
    if seen.insert(id.clone()) {
        return id;
    }
    let mut suffix = 2u64;
    loop {
        let candidate = format!("{id}-{suffix}");
        if seen.insert(candidate.clone()) {
            warnings.push(format!(
                "{entity} id \"{id}\" was duplicated; renamed to \"{candidate}\"."
            ));
            return candidate;
        }
        suffix += 1;
    }
}

fn text_field(
    value: Option<&Value>,
    label: &str,
    default: &str,
    warnings: &mut Vec<String>,
) -> String {
    match value {
        Some(Value::String(text)) if !text.is_empty() => text.clone(),
        None | Some(Value::Null) | Some(Value::String(_)) => default.to_string(),
        Some(_) => {
            warnings.push(format!("{label} was not text and was reset."));
            default.to_string()
        }
    }
}

fn finite_number(value: Option<&Value>) -> Option<f64> {
    value.and_then(Value::as_f64).filter(|v| v.is_finite())
}

fn non_empty_text(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|text| !text.is_empty())
}

fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        other => other.to_string(),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
