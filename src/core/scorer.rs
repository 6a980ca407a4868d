use crate::domain::model::SkillSet;

/// 職缺技能中候選人具備的比例。
///
/// 非對稱：候選人多出的技能不扣分。職缺沒有任何技能時分數為 0。
pub struct MatchScorer;

impl MatchScorer {
    pub fn score(posting_skills: &SkillSet, candidate_skills: &SkillSet) -> f64 {
        if posting_skills.is_empty() {
            return 0.0;
        }
        let matches = posting_skills.intersection_count(candidate_skills);
        matches as f64 / posting_skills.len() as f64
    }
}
