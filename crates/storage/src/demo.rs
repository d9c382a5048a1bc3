//! Built-in clustering tests for running without a server.
//!
//! Each problem shows one item as its head and offers four options: one item
//! from the same cluster plus three items from other clusters.

use quiz_core::model::{TestName, TestTypeId, ValidSelection};

use crate::repository::{InMemoryRepository, OptionRecord, ProblemRecord, StorageError};

const OPTIONS_PER_PROBLEM: usize = 4;

/// A named group of items that belong together.
#[derive(Debug, Clone, Copy)]
pub struct Cluster {
    pub label: &'static str,
    pub items: &'static [&'static str],
}

/// A clustering test: a name and the clusters it draws from.
#[derive(Debug, Clone, Copy)]
pub struct ClusteringBank {
    pub name: &'static str,
    pub clusters: &'static [Cluster],
}

pub const RADICALS: ClusteringBank = ClusteringBank {
    name: "常用部首",
    clusters: &[
        Cluster { label: "氵", items: &["江", "河", "湖", "海"] },
        Cluster { label: "火", items: &["灯", "炉", "炒", "烧"] },
        Cluster { label: "木", items: &["林", "森", "松", "柏"] },
        Cluster { label: "口", items: &["叫", "吃", "喝", "吹"] },
        Cluster { label: "扌", items: &["打", "找", "拉", "推"] },
    ],
};

pub const WORDS: ClusteringBank = ClusteringBank {
    name: "词语归类",
    clusters: &[
        Cluster { label: "水果", items: &["苹果", "香蕉", "葡萄"] },
        Cluster { label: "动物", items: &["老虎", "熊猫", "兔子"] },
        Cluster { label: "颜色", items: &["红色", "蓝色", "绿色"] },
        Cluster { label: "天气", items: &["下雨", "刮风", "晴天"] },
    ],
};

pub const BANKS: &[ClusteringBank] = &[RADICALS, WORDS];

impl ClusteringBank {
    /// One problem per item, generated deterministically.
    ///
    /// The answer rotates through the option slots so it is not always first.
    #[must_use]
    pub fn problems(&self) -> Vec<ProblemRecord> {
        let mut records = Vec::new();
        for (c, cluster) in self.clusters.iter().enumerate() {
            if cluster.items.len() < 2 {
                continue;
            }
            let others: Vec<&Cluster> = self
                .clusters
                .iter()
                .enumerate()
                .filter(|(o, _)| *o != c)
                .map(|(_, other)| other)
                .collect();
            if others.len() < OPTIONS_PER_PROBLEM - 1 {
                continue;
            }
            for (k, head) in cluster.items.iter().enumerate() {
                let partner = cluster.items[(k + 1) % cluster.items.len()];
                let mut opts: Vec<&str> = (0..OPTIONS_PER_PROBLEM - 1)
                    .map(|d| {
                        let other = others[(k + d) % others.len()];
                        other.items[(k + d) % other.items.len()]
                    })
                    .collect();
                let slot = (records.len()) % OPTIONS_PER_PROBLEM;
                opts.insert(slot, partner);
                records.push(ProblemRecord {
                    id: i64::try_from(records.len()).unwrap_or(i64::MAX),
                    answer: i64::try_from(slot).unwrap_or(0),
                    head: (*head).to_string(),
                    explain: format!("以下字符同类：{}", cluster.items.join(" ")),
                    opts: opts
                        .into_iter()
                        .enumerate()
                        .map(|(i, html)| OptionRecord {
                            id: i64::try_from(i).unwrap_or(0),
                            html: html.to_string(),
                        })
                        .collect(),
                });
            }
        }
        records
    }

    #[must_use]
    pub fn selection(&self) -> Option<ValidSelection> {
        TestName::new(self.name).map(|name| ValidSelection::new(TestTypeId::CLUSTERING, name))
    }
}

/// In-memory repository pre-loaded with every built-in bank.
///
/// # Errors
///
/// Returns `StorageError` if the repository lock is poisoned.
pub fn seeded_repository(repo: InMemoryRepository) -> Result<InMemoryRepository, StorageError> {
    for bank in BANKS {
        if let Some(selection) = bank.selection() {
            repo.insert_test(selection, bank.problems())?;
        }
    }
    log::info!("seeded {} offline demo tests", BANKS.len());
    Ok(repo)
}
