use crate::core::catalog::SkillCatalog;
use crate::domain::model::{MarketSummary, Posting, PostingMonth, SkillCount, SkillSalary};
use std::collections::{BTreeMap, HashMap};

/// 薪資累加器：以總和與筆數合併，最後才相除
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct SalaryTally {
    sum: f64,
    count: usize,
}

/// 可合併的部分統計。分片累加後 `merge` 的結果與單次累加相同。
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MarketAccumulator {
    skill_counts: HashMap<String, usize>,
    postings_by_period: BTreeMap<PostingMonth, usize>,
    salary_tallies: HashMap<String, SalaryTally>,
}

impl MarketAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, posting: &Posting) {
        for skill in posting.skills().iter() {
            *self.skill_counts.entry(skill.to_string()).or_insert(0) += 1;

            if let Some(salary) = posting.salary_value() {
                let tally = self.salary_tallies.entry(skill.to_string()).or_default();
                tally.sum += salary as f64;
                tally.count += 1;
            }
        }

        // 沒有日期的職缺不列入時間分佈
        if let Some(month) = posting.month() {
            *self.postings_by_period.entry(month).or_insert(0) += 1;
        }
    }

    pub fn merge(mut self, other: MarketAccumulator) -> MarketAccumulator {
        for (skill, count) in other.skill_counts {
            *self.skill_counts.entry(skill).or_insert(0) += count;
        }
        for (month, count) in other.postings_by_period {
            *self.postings_by_period.entry(month).or_insert(0) += count;
        }
        for (skill, tally) in other.salary_tallies {
            let entry = self.salary_tallies.entry(skill).or_default();
            entry.sum += tally.sum;
            entry.count += tally.count;
        }
        self
    }

    pub fn finish(self, catalog: &SkillCatalog) -> MarketSummary {
        let mut skill_counts: Vec<SkillCount> = catalog
            .iter()
            .filter_map(|skill| {
                self.skill_counts.get(skill).map(|&count| SkillCount {
                    skill: skill.to_string(),
                    count,
                })
            })
            .collect();
        // 穩定排序：同數量維持目錄順序
        skill_counts.sort_by(|a, b| b.count.cmp(&a.count));

        let salary_by_skill = catalog
            .iter()
            .filter_map(|skill| {
                self.salary_tallies
                    .get(skill)
                    .filter(|tally| tally.count > 0)
                    .map(|tally| SkillSalary {
                        skill: skill.to_string(),
                        average_salary: tally.sum / tally.count as f64,
                        postings: tally.count,
                    })
            })
            .collect();

        MarketSummary {
            skill_counts,
            salary_by_skill,
            postings_by_period: self.postings_by_period,
        }
    }
}

/// 職缺集合的市場統計：技能次數、每月職缺數、各技能平均薪資
pub struct MarketAggregator<'a> {
    catalog: &'a SkillCatalog,
}

impl<'a> MarketAggregator<'a> {
    pub fn new(catalog: &'a SkillCatalog) -> Self {
        Self { catalog }
    }

    pub fn aggregate(&self, postings: &[Posting]) -> MarketSummary {
        let mut accumulator = MarketAccumulator::new();
        for posting in postings {
            accumulator.add(posting);
        }
        accumulator.finish(self.catalog)
    }

    /// 分片累加再合併，結果與 `aggregate` 相同
    pub fn aggregate_sharded(&self, postings: &[Posting], shard_size: usize) -> MarketSummary {
        let shard_size = shard_size.max(1);
        postings
            .chunks(shard_size)
            .map(|shard| {
                let mut accumulator = MarketAccumulator::new();
                shard.iter().for_each(|p| accumulator.add(p));
                accumulator
            })
            .fold(MarketAccumulator::new(), MarketAccumulator::merge)
            .finish(self.catalog)
    }
}
