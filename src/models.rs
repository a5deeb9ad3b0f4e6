use serde_derive::{Deserialize, Serialize};

/// Fields requested from sacct, in output order.
pub const FIELDS: [&str; 15] = [
    "JobID",
    "JobName",
    "User",
    "Group",
    "Start",
    "End",
    "Elapsed",
    "CPUTimeRAW",
    "Partition",
    "NCPUS",
    "NNodes",
    "NodeList",
    "MaxRSS",
    "MaxVMSize",
    "State",
];

pub const FIELD_COUNT: usize = FIELDS.len();

/// Jobs submitted through the grid CE carry this job name prefix.
pub const GRID_JOB_NAME_PREFIX: &str = "crm01_";

/// Local (non-grid) users; their jobs are reported by other means.
pub const LOCAL_USER_PREFIX: &str = "plg";

/// One line of `sacct --parsable2` output.
///
/// Field order matches `FIELDS`; serde maps positionally since sacct is
/// queried with `--noheader`.
#[derive(Debug, Default, Deserialize, Serialize, PartialEq, Eq, Clone)]
#[serde(rename_all = "PascalCase")]
pub struct AccountingRecord {
    #[serde(rename = "JobID")]
    pub job_id: String,
    pub job_name: String,
    pub user: String,
    pub group: String,
    pub start: String,
    pub end: String,
    pub elapsed: String,
    #[serde(rename = "CPUTimeRAW")]
    pub cpu_time_raw: String,
    pub partition: String,
    #[serde(rename = "NCPUS")]
    pub ncpus: String,
    #[serde(rename = "NNodes")]
    pub nnodes: String,
    pub node_list: String,
    #[serde(rename = "MaxRSS")]
    pub max_rss: String,
    #[serde(rename = "MaxVMSize")]
    pub max_vm_size: String,
    pub state: String,
}

impl AccountingRecord {
    /// The job id without its step suffix (`301088.batch` -> `301088`).
    pub fn logical_job_id(&self) -> &str {
        match self.job_id.split_once('.') {
            Some((id, _)) => id,
            None => &self.job_id,
        }
    }

    /// Whether this record may open a new job entry.
    pub fn is_grid_job(&self) -> bool {
        self.job_name.starts_with(GRID_JOB_NAME_PREFIX) && !self.user.starts_with(LOCAL_USER_PREFIX)
    }

    /// Takes memory usage from a step record of the same job.
    ///
    /// sacct reports `0` where no sample was taken; that is written out empty.
    pub fn merge_step_usage(&mut self, step: &AccountingRecord) {
        self.max_rss = normalize_usage(&step.max_rss);
        self.max_vm_size = normalize_usage(&step.max_vm_size);
    }
}

fn normalize_usage(value: &str) -> String {
    if value == "0" {
        String::new()
    } else {
        value.to_string()
    }
}
