use crate::domain::model::{MarketSummary, Recommendations, ReportTable};

pub const TOP_SKILLS: &str = "Top Skills";
pub const SALARY_BY_SKILL: &str = "Salary by Skill";
pub const POSTINGS_OVER_TIME: &str = "Job Postings Over Time";
pub const RECOMMENDED_JOBS: &str = "Recommended Jobs";
pub const MISSING_SKILLS: &str = "Missing Skills";

/// 市場統計的三張表；薪資與時間分佈為空時不輸出
pub fn market_tables(summary: &MarketSummary) -> Vec<ReportTable> {
    let mut top_skills = ReportTable::new(TOP_SKILLS, &["Skill", "Count"]);
    for entry in &summary.skill_counts {
        top_skills.push_row(vec![entry.skill.clone(), entry.count.to_string()]);
    }

    let mut salary = ReportTable::new(SALARY_BY_SKILL, &["Skill", "Avg Salary"]);
    for entry in &summary.salary_by_skill {
        salary.push_row(vec![
            entry.skill.clone(),
            format!("{:.2}", entry.average_salary),
        ]);
    }

    let mut over_time = ReportTable::new(POSTINGS_OVER_TIME, &["Month", "Postings"]);
    for (month, count) in &summary.postings_by_period {
        over_time.push_row(vec![month.to_string(), count.to_string()]);
    }

    let mut tables = vec![top_skills];
    tables.extend([salary, over_time].into_iter().filter(|t| !t.is_empty()));
    tables
}

pub fn recommendation_tables(recommendations: &Recommendations) -> Vec<ReportTable> {
    let mut jobs = ReportTable::new(
        RECOMMENDED_JOBS,
        &["title", "company", "location", "match_score"],
    );
    for result in &recommendations.ranked {
        jobs.push_row(vec![
            result.title.clone(),
            result.company.clone(),
            result.location.clone(),
            format!("{:.4}", result.score),
        ]);
    }

    let mut gaps = ReportTable::new(MISSING_SKILLS, &["Missing Skill", "Count"]);
    for gap in &recommendations.skill_gaps {
        gaps.push_row(vec![gap.skill.clone(), gap.demand.to_string()]);
    }

    vec![jobs, gaps]
}
