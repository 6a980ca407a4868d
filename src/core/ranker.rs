use crate::core::catalog::SkillCatalog;
use crate::core::scorer::MatchScorer;
use crate::domain::model::{Candidate, MatchResult, Posting, Recommendations, SkillGap};

/// 依技能重疊度排序職缺，並列出候選人缺少但市場需要的技能
pub struct RecommendationRanker<'a> {
    catalog: &'a SkillCatalog,
}

impl<'a> RecommendationRanker<'a> {
    pub fn new(catalog: &'a SkillCatalog) -> Self {
        Self { catalog }
    }

    pub fn rank(&self, postings: &[Posting], candidate: &Candidate) -> Recommendations {
        let mut ranked: Vec<MatchResult> = postings
            .iter()
            .enumerate()
            .map(|(index, posting)| MatchResult {
                posting_index: index,
                title: posting.title.clone(),
                company: posting.company.clone(),
                location: posting.location.clone(),
                score: MatchScorer::score(posting.skills(), candidate.skills()),
            })
            .collect();
        // sort_by 為穩定排序，同分保留原始順序
        ranked.sort_by(|a, b| b.score.total_cmp(&a.score));

        Recommendations {
            candidate_skills: candidate.skills().clone(),
            ranked,
            skill_gaps: self.skill_gaps(postings, candidate),
        }
    }

    /// 候選人缺少的每個目錄技能，以及需要它的職缺數（含 0）
    pub fn skill_gaps(&self, postings: &[Posting], candidate: &Candidate) -> Vec<SkillGap> {
        let mut gaps: Vec<SkillGap> = self
            .catalog
            .iter()
            .filter(|skill| !candidate.skills().contains(skill))
            .map(|skill| SkillGap {
                skill: skill.to_string(),
                demand: postings
                    .iter()
                    .filter(|posting| posting.skills().contains(skill))
                    .count(),
            })
            .collect();
        gaps.sort_by(|a, b| b.demand.cmp(&a.demand));
        gaps
    }
}
