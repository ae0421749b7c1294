//! Episode reward records and their tabular output.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::stats::RewardStats;
use crate::types::AgentKind;

/// File name of the reward table inside the output directory.
pub const REWARD_FILE: &str = "train_reward.csv";

/// `test_id` of rows produced by training passes.
pub const TRAIN_ID: i64 = -1;

/// Reward summary of one training pass or one test episode.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RewardRecord {
    pub agent: AgentKind,
    pub step: u64,
    /// Test scenario index, or [`TRAIN_ID`] for training.
    pub test_id: i64,
    pub avg_reward: f64,
    pub std_reward: f64,
}

impl RewardRecord {
    /// Row for a training pass ending at global step `step`.
    pub fn train(agent: AgentKind, step: u64, stats: RewardStats) -> Self {
        Self {
            agent,
            step,
            test_id: TRAIN_ID,
            avg_reward: stats.mean,
            std_reward: stats.std,
        }
    }

    /// Row for test scenario `test_ind` of the pass run at `step`.
    pub fn test(agent: AgentKind, step: u64, test_ind: usize, stats: RewardStats) -> Self {
        Self {
            agent,
            step,
            test_id: test_ind as i64,
            avg_reward: stats.mean,
            std_reward: stats.std,
        }
    }

    pub fn is_train(&self) -> bool {
        self.test_id == TRAIN_ID
    }
}

/// Append-only log of reward records, written once at shutdown.
#[derive(Debug, Default, Clone)]
pub struct RewardLog {
    records: Vec<RewardRecord>,
}

impl RewardLog {
    /// Creates an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record; existing records are never modified.
    pub fn push(&mut self, record: RewardRecord) {
        self.records.push(record);
    }

    /// Records in insertion order.
    pub fn records(&self) -> &[RewardRecord] {
        &self.records
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no record was appended yet.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Writes the table as CSV to `writer`.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> std::io::Result<()> {
        writeln!(writer, "agent,step,test_id,avg_reward,std_reward")?;
        for r in &self.records {
            writeln!(
                writer,
                "{},{},{},{},{}",
                r.agent, r.step, r.test_id, r.avg_reward, r.std_reward
            )?;
        }
        writer.flush()
    }

    /// Writes `train_reward.csv` under `dir`, creating the directory if
    /// needed. Returns the path of the written file.
    pub fn save(&self, dir: impl AsRef<Path>) -> std::io::Result<PathBuf> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(REWARD_FILE);
        let writer = BufWriter::new(File::create(&path)?);
        self.write_csv(writer)?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(mean: f64, std: f64) -> RewardStats {
        RewardStats { mean, std }
    }

    #[test]
    fn train_rows_use_negative_id() {
        let r = RewardRecord::train(AgentKind::PolicyGradientMulti, 720, stats(-1.5, 0.5));
        assert!(r.is_train());
        let t = RewardRecord::test(AgentKind::PolicyGradientMulti, 720, 3, stats(-1.0, 0.2));
        assert_eq!(t.test_id, 3);
        assert!(!t.is_train());
    }

    #[test]
    fn csv_has_header_and_rows() {
        let mut log = RewardLog::new();
        log.push(RewardRecord::train(AgentKind::PolicyGradientSingle, 100, stats(2.5, 0.5)));
        log.push(RewardRecord::test(AgentKind::PolicyGradientSingle, 100, 0, stats(-1.0, 0.0)));

        let mut buf = Vec::new();
        log.write_csv(&mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "agent,step,test_id,avg_reward,std_reward");
        assert_eq!(lines[1], "a2c,100,-1,2.5,0.5");
        assert_eq!(lines[2], "a2c,100,0,-1,0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn save_creates_directory() {
        let dir = std::env::temp_dir()
            .join(format!("rl_driver_{}", uuid::Uuid::new_v4()))
            .join("nested");
        let log = RewardLog::new();
        let path = log.save(&dir).unwrap();
        assert_eq!(path, dir.join(REWARD_FILE));
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text.trim(), "agent,step,test_id,avg_reward,std_reward");
        fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }

    #[cfg(feature = "serde")]
    #[test]
    fn record_serializes_agent_name() {
        let r = RewardRecord::train(AgentKind::ValueBased, 5, stats(1.0, 0.0));
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"agent\":\"iql\""));
        let back: RewardRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
