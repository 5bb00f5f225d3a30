//! JSON instance documents.
//!
//! The document lists the job count, the number of renewable resource
//! types, the scheduling horizon, the resource capacities and one record
//! per job:
//!
//! ```json
//! {
//!   "numberOfJobs": 3,
//!   "resourceNumber": 1,
//!   "horizon": 10,
//!   "resources": [1],
//!   "jobs": [
//!     { "jobnr": 1, "precedents": [],  "requests": { "duration": 0, "renews": [0] } },
//!     { "jobnr": 2, "precedents": [1], "requests": { "duration": 2, "renews": [1] } },
//!     { "jobnr": 3, "precedents": [2], "requests": { "duration": 0, "renews": [0] } }
//!   ]
//! }
//! ```
//!
//! Job numbers are 1-based in the document and 0-based in [`Project`].
//! Integer fields may be written as JSON numbers or as numeric strings.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use super::model::{Project, Time};
use crate::error::{InstanceError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InstanceDocument {
    number_of_jobs: IntField,
    #[serde(alias = "resouceNumber")]
    resource_number: IntField,
    horizon: IntField,
    resources: Vec<IntField>,
    jobs: Vec<JobRecord>,
}

#[derive(Debug, Deserialize)]
struct JobRecord {
    jobnr: IntField,
    #[serde(default)]
    precedents: Vec<IntField>,
    requests: RequestRecord,
}

#[derive(Debug, Deserialize)]
struct RequestRecord {
    duration: IntField,
    renews: Vec<IntField>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum IntField {
    Number(u64),
    Text(String),
}

impl IntField {
    fn get(&self, field: &'static str) -> Result<u64, InstanceError> {
        match self {
            IntField::Number(v) => Ok(*v),
            IntField::Text(s) => s.trim().parse().map_err(|_| InstanceError::InvalidInteger {
                field,
                value: s.clone(),
            }),
        }
    }

    fn get_u32(&self, field: &'static str) -> Result<u32, InstanceError> {
        let v = self.get(field)?;
        u32::try_from(v).map_err(|_| InstanceError::InvalidInteger {
            field,
            value: v.to_string(),
        })
    }

    fn get_usize(&self, field: &'static str) -> Result<usize, InstanceError> {
        let v = self.get(field)?;
        usize::try_from(v).map_err(|_| InstanceError::InvalidInteger {
            field,
            value: v.to_string(),
        })
    }
}

/// Reads and parses an instance file.
///
/// # Errors
///
/// [`Error::Instance`](crate::Error::Instance) if the file cannot be read or
/// the document is malformed, [`Error::Config`](crate::Error::Config) if the
/// resulting model is invalid.
pub fn load_instance(path: impl AsRef<Path>) -> Result<Project> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).map_err(|source| InstanceError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let project = parse_instance(&text)?;
    log::info!(
        "loaded {}: {} jobs, {} resources, horizon {}",
        path.display(),
        project.job_count(),
        project.resource_count(),
        project.horizon()
    );
    Ok(project)
}

/// Parses an instance document from a string.
pub fn parse_instance(json: &str) -> Result<Project> {
    let doc: InstanceDocument = serde_json::from_str(json).map_err(InstanceError::from)?;

    let n = doc.number_of_jobs.get_usize("numberOfJobs")?;
    if doc.jobs.len() != n {
        return Err(InstanceError::JobCountMismatch {
            declared: n,
            found: doc.jobs.len(),
        }
        .into());
    }
    let resource_count = doc.resource_number.get_usize("resourceNumber")?;
    if doc.resources.len() != resource_count {
        return Err(InstanceError::ResourceCountMismatch {
            declared: resource_count,
            found: doc.resources.len(),
        }
        .into());
    }
    let horizon: Time = doc.horizon.get_u32("horizon")?;
    let capacities = doc
        .resources
        .iter()
        .map(|c| c.get_u32("resources"))
        .collect::<Result<Vec<_>, _>>()?;

    let mut durations = vec![0; n];
    let mut predecessors = vec![Vec::new(); n];
    let mut requirements = vec![Vec::new(); n];
    let mut seen = vec![false; n];

    for record in &doc.jobs {
        let number = record.jobnr.get_usize("jobnr")?;
        if number == 0 || number > n {
            return Err(InstanceError::JobNumberOutOfRange { number, jobs: n }.into());
        }
        let job = number - 1;
        if seen[job] {
            return Err(InstanceError::DuplicateJob(number).into());
        }
        seen[job] = true;

        for p in &record.precedents {
            let pred = p.get_usize("precedents")?;
            if pred == 0 || pred > n {
                return Err(InstanceError::PredecessorOutOfRange {
                    job: number,
                    number: pred,
                    jobs: n,
                }
                .into());
            }
            predecessors[job].push(pred - 1);
        }
        durations[job] = record.requests.duration.get_u32("duration")?;
        requirements[job] = record
            .requests
            .renews
            .iter()
            .map(|r| r.get_u32("renews"))
            .collect::<Result<Vec<_>, _>>()?;
    }

    Ok(Project::new(
        durations,
        predecessors,
        requirements,
        capacities,
        horizon,
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ConfigError, Error};

    const CHAIN: &str = r#"{
        "numberOfJobs": 3,
        "resourceNumber": 1,
        "horizon": 10,
        "resources": [1],
        "jobs": [
            { "jobnr": 1, "precedents": [],  "requests": { "duration": 0, "renews": [0] } },
            { "jobnr": 2, "precedents": [1], "requests": { "duration": 2, "renews": [1] } },
            { "jobnr": 3, "precedents": [2], "requests": { "duration": 0, "renews": [0] } }
        ]
    }"#;

    #[test]
    fn test_parse_chain() {
        let p = parse_instance(CHAIN).unwrap();
        assert_eq!(p.job_count(), 3);
        assert_eq!(p.horizon(), 10);
        assert_eq!(p.capacities(), &[1]);
        assert_eq!(p.predecessors(1), &[0]);
        assert_eq!(p.predecessors(2), &[1]);
        assert_eq!(p.duration(1), 2);
        assert_eq!(p.requirement(1), &[1]);
    }

    #[test]
    fn test_string_numbers_and_alias() {
        let json = r#"{
            "numberOfJobs": "2",
            "resouceNumber": 1,
            "horizon": "5",
            "resources": ["3"],
            "jobs": [
                { "jobnr": "2", "precedents": ["1"], "requests": { "duration": "4", "renews": ["2"] }, "EF": 4, "LF": 5 },
                { "jobnr": "1", "requests": { "duration": 0, "renews": [0] } }
            ]
        }"#;
        let p = parse_instance(json).unwrap();
        assert_eq!(p.job_count(), 2);
        assert_eq!(p.capacities(), &[3]);
        assert_eq!(p.duration(1), 4);
        assert_eq!(p.predecessors(1), &[0]);
        assert_eq!(p.requirement(1), &[2]);
    }

    #[test]
    fn test_missing_job_count_is_input_error() {
        let json = r#"{ "resourceNumber": 1, "horizon": 5, "resources": [1], "jobs": [] }"#;
        let err = parse_instance(json).unwrap_err();
        assert!(matches!(err, Error::Instance(InstanceError::Parse(_))));
    }

    #[test]
    fn test_syntax_error() {
        let err = parse_instance("{ not json").unwrap_err();
        assert!(matches!(err, Error::Instance(InstanceError::Parse(_))));
    }

    #[test]
    fn test_job_count_mismatch() {
        let json = CHAIN.replace("\"numberOfJobs\": 3", "\"numberOfJobs\": 4");
        let err = parse_instance(&json).unwrap_err();
        assert!(matches!(
            err,
            Error::Instance(InstanceError::JobCountMismatch {
                declared: 4,
                found: 3
            })
        ));
    }

    #[test]
    fn test_resource_count_mismatch() {
        let json = CHAIN.replace("\"resourceNumber\": 1", "\"resourceNumber\": 2");
        let err = parse_instance(&json).unwrap_err();
        assert!(matches!(
            err,
            Error::Instance(InstanceError::ResourceCountMismatch { .. })
        ));
    }

    #[test]
    fn test_duplicate_job() {
        let json = CHAIN.replace("\"jobnr\": 3", "\"jobnr\": 2");
        let err = parse_instance(&json).unwrap_err();
        assert!(matches!(err, Error::Instance(InstanceError::DuplicateJob(2))));
    }

    #[test]
    fn test_predecessor_out_of_range() {
        let json = CHAIN.replace("\"precedents\": [2]", "\"precedents\": [9]");
        let err = parse_instance(&json).unwrap_err();
        assert!(matches!(
            err,
            Error::Instance(InstanceError::PredecessorOutOfRange { number: 9, .. })
        ));
    }

    #[test]
    fn test_bad_integer_string() {
        let json = CHAIN.replace("\"horizon\": 10", "\"horizon\": \"ten\"");
        let err = parse_instance(&json).unwrap_err();
        assert!(matches!(
            err,
            Error::Instance(InstanceError::InvalidInteger {
                field: "horizon",
                ..
            })
        ));
    }

    #[test]
    fn test_zero_horizon_is_config_error() {
        let json = CHAIN.replace("\"horizon\": 10", "\"horizon\": 0");
        let err = parse_instance(&json).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::ZeroHorizon)));
    }

    #[test]
    fn test_zero_jobs_is_config_error() {
        let json = r#"{ "numberOfJobs": 0, "resourceNumber": 0, "horizon": 5, "resources": [], "jobs": [] }"#;
        let err = parse_instance(json).unwrap_err();
        assert!(matches!(err, Error::Config(ConfigError::NoJobs)));
    }

    #[test]
    fn test_load_missing_file() {
        let err = load_instance("/nonexistent/instance.json").unwrap_err();
        assert!(matches!(err, Error::Instance(InstanceError::Io { .. })));
    }
}
