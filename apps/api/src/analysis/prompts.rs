// Prompt text for resume review.

/// Reviewer persona and task. Followed directly by the resume text.
pub const REVIEW_PREAMBLE: &str = "\
You are an experienced HR professional with technical experience in one of the following \
job roles: Data Science, Data Analyst, DevOps, Machine Learning Engineer, Prompt Engineer, \
AI Engineer, Full Stack Web Development, Big Data Engineering, Marketing Analyst, \
Human Resource Manager, Software Developer. Your task is to review the provided resume.
Please share your professional evaluation on whether the candidate's profile aligns with the role. \
Also mention the skills the candidate already has, suggest skills to add to improve the resume, \
and suggest courses the candidate might take to build those skills. \
Highlight the strengths and weaknesses.

Resume:
";

/// Comparison block appended after the resume when a job description is given.
/// Replace `{job_description}` before sending.
pub const JOB_COMPARISON_TEMPLATE: &str = "

Additionally, compare this resume to the following job description:

Job Description:
{job_description}

Highlight the strengths and weaknesses of the applicant in relation to the specified job requirements.
";

/// Composes the review prompt. A blank job description is treated as absent.
pub fn build_review_prompt(resume_text: &str, job_description: Option<&str>) -> String {
    let mut prompt = format!("{REVIEW_PREAMBLE}{resume_text}\n");

    if let Some(jd) = job_description.filter(|jd| !jd.trim().is_empty()) {
        prompt.push_str(&JOB_COMPARISON_TEMPLATE.replace("{job_description}", jd));
    }

    prompt
}
