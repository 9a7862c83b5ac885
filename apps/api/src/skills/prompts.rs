// Skill-intelligence prompt templates.
// Templates are data: each names its parameters, and `render` refuses to produce a
// prompt with a parameter missing. Placeholders are substituted in a single pass so
// user text containing `{...}` is never re-expanded.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PromptError {
    #[error("prompt '{template}' is missing parameter '{param}'")]
    MissingParam {
        template: &'static str,
        param: &'static str,
    },

    #[error("prompt '{template}' has no parameter '{param}'")]
    UnknownParam {
        template: &'static str,
        param: String,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub template: &'static str,
    pub params: &'static [&'static str],
}

impl PromptTemplate {
    pub fn render(&self, args: &[(&str, &str)]) -> Result<String, PromptError> {
        if let Some((unknown, _)) = args
            .iter()
            .find(|(k, _)| !self.params.iter().any(|p| p == k))
        {
            return Err(PromptError::UnknownParam {
                template: self.name,
                param: unknown.to_string(),
            });
        }

        let mut values = Vec::with_capacity(self.params.len());
        for param in self.params {
            let value = args
                .iter()
                .find(|(k, _)| k == param)
                .map(|(_, v)| *v)
                .ok_or(PromptError::MissingParam {
                    template: self.name,
                    param: *param,
                })?;
            values.push((*param, value));
        }

        let mut out = String::with_capacity(self.template.len());
        let mut rest = self.template;
        while let Some(open) = rest.find('{') {
            out.push_str(&rest[..open]);
            let tail = &rest[open + 1..];
            let hit = values.iter().find_map(|(param, value)| {
                tail.strip_prefix(param)
                    .and_then(|r| r.strip_prefix('}'))
                    .map(|after| (*value, after))
            });
            match hit {
                Some((value, after)) => {
                    out.push_str(value);
                    rest = after;
                }
                None => {
                    out.push('{');
                    rest = tail;
                }
            }
        }
        out.push_str(rest);
        Ok(out)
    }
}

pub const SKILL_EXTRACTION: PromptTemplate = PromptTemplate {
    name: "skill_extraction",
    params: &["resume_text"],
    template: r#"You are an expert recruiter. Extract only the candidate's relevant technical and professional skills from the following resume text. Return ONLY a JSON array of skill names (no explanation, no extra text).
Example format: ["Python", "SQL", "Project Management"]

Resume:
{resume_text}

Skills (JSON array only):"#,
};

pub const SKILL_RECOMMENDATION: PromptTemplate = PromptTemplate {
    name: "skill_recommendation",
    params: &["existing_skills", "role", "limit"],
    template: r#"You are an expert hiring advisor and career coach who knows the exact skills hiring managers look for across industries.
Task: Given the candidate's existing skills and the target role (which may include seniority and industry), recommend up to {limit} additional concrete skills that will most increase this candidate's hireability for that specific role.
Guidelines:
- Do NOT repeat any skill already present in the existing skills.
- Consider seniority (e.g. 'Senior' -> prioritize architecture, leadership, system design; 'Junior' -> prioritize hands-on tools and frameworks).
- Consider industry when present (e.g. 'fintech' -> prioritize security/compliance, 'healthcare' -> data privacy/standards).
- Prioritize transferable, high-impact skills (platforms, frameworks, cloud, data tooling, testing/CI, observability) and avoid vague concepts.
Output: Return ONLY a compact JSON array of skill names (strings), e.g. ["Skill A", "Skill B"]. No explanations, no extra text.

Existing skills: {existing_skills}
Target role: {role}

Recommendations (JSON array only):"#,
};

pub const SKILL_ROADMAP: PromptTemplate = PromptTemplate {
    name: "skill_roadmap",
    params: &["skills"],
    template: r#"Create a detailed learning roadmap for these skills: {skills}

For EACH skill, provide:
1. Three levels: Beginner, Intermediate, Advanced
2. Clear description for each level
3. 2-3 specific project ideas per level
4. Free learning resources (courses, tutorials, docs)
5. Realistic timeframe for each level
6. Prerequisites needed
7. Current market relevance

Return ONLY valid JSON in this EXACT format:
{
  "roadmap": {
    "Skill Name": {
      "levels": [
        {
          "level": "Beginner",
          "description": "What to learn at this stage",
          "projects": ["Project 1", "Project 2"],
          "resources": ["Free resource 1", "Free resource 2"],
          "timeframe": "X-Y months"
        }
      ],
      "prerequisites": ["Prerequisite 1", "Prerequisite 2"],
      "market_relevance": "Current demand and applications"
    }
  }
}

IMPORTANT: Return ONLY the JSON object, no markdown, no explanations."#,
};

pub const MARKET_ANALYSIS: PromptTemplate = PromptTemplate {
    name: "market_analysis",
    params: &["skills"],
    template: r#"Analyze the current job market for these skills: {skills}

For EACH skill, provide:
1. Market demand score (1-10 scale)
2. Growth trend (growing/stable/declining)
3. Key industries hiring for this skill
4. Common job roles requiring this skill
5. Complementary skills that enhance marketability
6. Brief market insights and future outlook

Return ONLY valid JSON in this EXACT format:
{
  "skills": {
    "Skill Name": {
      "relevance_score": 8,
      "trend": "growing",
      "industries": ["Industry 1", "Industry 2", "Industry 3"],
      "related_roles": ["Role 1", "Role 2", "Role 3"],
      "complementary_skills": ["Skill 1", "Skill 2", "Skill 3"],
      "insights": "Detailed market analysis and outlook"
    }
  }
}

IMPORTANT: Return ONLY the JSON object, no markdown, no explanations."#,
};

pub const PROJECT_IDEAS: PromptTemplate = PromptTemplate {
    name: "project_ideas",
    params: &["skills", "role"],
    template: r#"You are a career coach. Suggest 3 real-world portfolio project ideas that let a candidate practise and demonstrate these skills: {skills}
Target role: {role}

Each project must be small enough to finish in 2-6 weeks at 5-10 hours per week, and should use several of the listed skills together.

Return ONLY valid JSON in this EXACT format:
{
  "projects": [
    {
      "title": "Project title",
      "description": "Two or three sentences describing what to build",
      "stack": ["Technology 1", "Technology 2"],
      "skills": ["Skill practised 1", "Skill practised 2"]
    }
  ]
}

IMPORTANT: Return ONLY the JSON object, no markdown, no explanations."#,
};

/// Role line used when the caller did not name one.
pub const UNSPECIFIED_ROLE: &str = "Not specified (general software industry)";

pub fn skill_extraction_prompt(resume_text: &str) -> Result<String, PromptError> {
    SKILL_EXTRACTION.render(&[("resume_text", resume_text)])
}

pub fn skill_recommendation_prompt(
    existing: &[String],
    role: Option<&str>,
    limit: usize,
) -> Result<String, PromptError> {
    let existing = if existing.is_empty() {
        "None listed".to_string()
    } else {
        existing.join(", ")
    };
    SKILL_RECOMMENDATION.render(&[
        ("existing_skills", &existing),
        ("role", role.unwrap_or(UNSPECIFIED_ROLE)),
        ("limit", &limit.to_string()),
    ])
}

pub fn skill_roadmap_prompt(skills: &[String]) -> Result<String, PromptError> {
    SKILL_ROADMAP.render(&[("skills", &skills.join(", "))])
}

pub fn market_analysis_prompt(skills: &[String]) -> Result<String, PromptError> {
    MARKET_ANALYSIS.render(&[("skills", &skills.join(", "))])
}

pub fn project_ideas_prompt(skills: &[String], role: Option<&str>) -> Result<String, PromptError> {
    PROJECT_IDEAS.render(&[
        ("skills", &skills.join(", ")),
        ("role", role.unwrap_or(UNSPECIFIED_ROLE)),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL: [PromptTemplate; 5] = [
        SKILL_EXTRACTION,
        SKILL_RECOMMENDATION,
        SKILL_ROADMAP,
        MARKET_ANALYSIS,
        PROJECT_IDEAS,
    ];

    #[test]
    fn test_every_template_mentions_each_param_once_or_more() {
        for template in ALL {
            for param in template.params {
                assert!(
                    template.template.contains(&format!("{{{param}}}")),
                    "{} never uses {{{param}}}",
                    template.name
                );
            }
        }
    }

    #[test]
    fn test_render_leaves_json_schema_braces_alone() {
        let prompt = skill_roadmap_prompt(&["rust".to_string(), "sql".to_string()]).unwrap();
        assert!(prompt.contains("these skills: rust, sql"));
        assert!(prompt.contains("\"roadmap\": {"));
        assert!(!prompt.contains("{skills}"));
    }

    #[test]
    fn test_user_text_is_not_re_expanded() {
        let prompt = skill_extraction_prompt("Built a {resume_text} templating engine").unwrap();
        assert!(prompt.contains("Built a {resume_text} templating engine"));
    }

    #[test]
    fn test_missing_param_is_an_error() {
        let err = SKILL_RECOMMENDATION
            .render(&[("existing_skills", "Rust"), ("role", "SRE")])
            .unwrap_err();
        assert_eq!(
            err,
            PromptError::MissingParam {
                template: "skill_recommendation",
                param: "limit"
            }
        );
    }

    #[test]
    fn test_unknown_param_is_an_error() {
        let err = SKILL_ROADMAP
            .render(&[("skills", "Rust"), ("role", "SRE")])
            .unwrap_err();
        assert!(matches!(err, PromptError::UnknownParam { .. }));
    }

    #[test]
    fn test_recommendation_prompt_carries_negative_constraint_and_role() {
        let prompt = skill_recommendation_prompt(
            &["Python".to_string(), "SQL".to_string()],
            Some("Senior fintech backend"),
            5,
        )
        .unwrap();
        assert!(prompt.contains("Do NOT repeat any skill"));
        assert!(prompt.contains("Existing skills: Python, SQL"));
        assert!(prompt.contains("Target role: Senior fintech backend"));
        assert!(prompt.contains("recommend up to 5 additional"));
    }

    #[test]
    fn test_recommendation_prompt_without_role_or_skills() {
        let prompt = skill_recommendation_prompt(&[], None, 8).unwrap();
        assert!(prompt.contains("Existing skills: None listed"));
        assert!(prompt.contains(UNSPECIFIED_ROLE));
    }
}
