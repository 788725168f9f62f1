//! `skycat check-template` - compile a template and describe it

use crate::cli::error::HelpfulError;
use crate::cli::output::{print_json, print_table};
use anyhow::Result;
use serde::Serialize;
use skycat_catalog::{FieldKind, FieldValues, FilenameTemplate};

#[derive(Debug)]
pub struct CheckTemplateArgs {
    pub template: String,
    pub json: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateReport {
    pub template: String,
    pub fields: Vec<FieldReport>,
    pub day_of_year: bool,
    pub versioned: bool,
    pub wildcards: bool,
    /// Rendering for 2009-01-01 00:00:00, version 1.0
    pub example: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FieldReport {
    pub field: FieldKind,
    pub width: usize,
}

pub fn run(args: CheckTemplateArgs) -> Result<()> {
    let report = describe(&args.template).map_err(HelpfulError::from)?;

    if args.json {
        return print_json(&report);
    }

    let rows = report
        .fields
        .iter()
        .map(|f| vec![f.field.to_string(), f.width.to_string()])
        .collect();
    print_table(&["FIELD", "WIDTH"], rows);
    println!("Day-of-year:  {}", yes_no(report.day_of_year));
    println!("Versioned:    {}", yes_no(report.versioned));
    println!("Wildcards:    {}", yes_no(report.wildcards));
    if let Some(example) = &report.example {
        println!("Example:      {}", example);
    }
    Ok(())
}

pub fn describe(template: &str) -> skycat_catalog::Result<TemplateReport> {
    let compiled = FilenameTemplate::compile(template)?;
    let sample = FieldValues::default()
        .with(FieldKind::Year, 2009)
        .with(FieldKind::Month, 1)
        .with(FieldKind::Day, 1)
        .with(FieldKind::Hour, 0)
        .with(FieldKind::Min, 0)
        .with(FieldKind::Sec, 0)
        .with(FieldKind::Version, 1)
        .with(FieldKind::Revision, 0);

    Ok(TemplateReport {
        template: compiled.as_str().to_string(),
        fields: compiled
            .fields()
            .map(|(field, width)| FieldReport { field, width })
            .collect(),
        day_of_year: compiled.has_field(FieldKind::Day) && !compiled.has_field(FieldKind::Month),
        versioned: compiled.has_version_fields(),
        wildcards: compiled.has_wildcards(),
        example: compiled.format(&sample).ok(),
    })
}

fn yes_no(flag: bool) -> &'static str {
    if flag {
        "yes"
    } else {
        "no"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_day_of_year_template() {
        let report = describe("inst_{year:04d}_{day:03d}.dat").unwrap();
        assert!(report.day_of_year);
        assert!(!report.versioned);
        assert_eq!(report.fields.len(), 2);
        assert_eq!(report.example.as_deref(), Some("inst_2009_001.dat"));
    }

    #[test]
    fn test_describe_wildcard_template_has_no_example() {
        let report = describe("f_??_{year:04d}_{month:02d}.dat").unwrap();
        assert!(report.wildcards);
        assert!(!report.day_of_year);
        assert!(report.example.is_none());
    }

    #[test]
    fn test_describe_rejects_fieldless_template() {
        assert!(describe("plain.dat").is_err());
    }
}
