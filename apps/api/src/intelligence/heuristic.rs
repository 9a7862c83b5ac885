//! Deterministic last-resort backend: static keyword tables instead of a model.
//!
//! Always answers with valid JSON for every task, so a chain ending here never
//! comes back empty-handed. Quality is deliberately modest: extraction is a
//! dictionary scan, recommendations come from role keywords and related-skill
//! lists, and roadmaps/market data are templated.

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::intelligence::{
    BackendError, BackendKind, GenerationRequest, SkillIntelligenceBackend, SkillTask,
};
use crate::skills::normalize::{skill_key, SkillSet};

const KNOWN_SKILLS: &[&str] = &[
    "Python", "Java", "JavaScript", "TypeScript", "Rust", "Golang", "C++", "C#", "Ruby",
    "PHP", "Kotlin", "Swift", "Scala", "SQL", "PostgreSQL", "MySQL", "MongoDB", "Redis",
    "SQLite", "GraphQL", "REST API", "gRPC", "React", "Angular", "Vue.js", "Next.js",
    "Node.js", "Express.js", "Django", "Flask", "FastAPI", "Spring Boot", ".NET",
    "Ruby on Rails", "HTML", "CSS", "Tailwind CSS", "AWS", "Azure", "GCP", "Docker",
    "Kubernetes", "Terraform", "Ansible", "Jenkins", "GitHub Actions", "CI/CD", "Git",
    "Linux", "Bash", "Kafka", "RabbitMQ", "Spark", "Hadoop", "Airflow", "dbt",
    "Snowflake", "Pandas", "NumPy", "scikit-learn", "TensorFlow", "PyTorch", "Keras",
    "Machine Learning", "Deep Learning", "NLP", "Computer Vision", "Data Analysis",
    "Data Visualization", "Tableau", "Power BI", "Statistics", "Microservices",
    "System Design", "Agile", "Scrum", "Jira", "Project Management", "Unit Testing",
    "Selenium", "Figma", "Leadership",
];

/// Keyed by lower-cased skill.
const RELATED_SKILLS: &[(&str, &[&str])] = &[
    ("python", &["Pandas", "FastAPI", "Pytest", "Docker", "SQL"]),
    ("java", &["Spring Boot", "Maven", "JUnit", "Kafka", "Microservices"]),
    ("javascript", &["TypeScript", "React", "Node.js", "Jest", "Webpack"]),
    ("typescript", &["React", "Node.js", "Next.js", "Jest"]),
    ("react", &["TypeScript", "Next.js", "Redux", "Jest", "Tailwind CSS"]),
    ("node.js", &["TypeScript", "Express.js", "PostgreSQL", "Docker"]),
    ("sql", &["PostgreSQL", "Data Modeling", "dbt", "Query Optimization"]),
    ("postgresql", &["Query Optimization", "Redis", "Database Indexing"]),
    ("docker", &["Kubernetes", "CI/CD", "Terraform", "Helm"]),
    ("kubernetes", &["Helm", "Prometheus", "Terraform", "Istio"]),
    ("aws", &["Terraform", "AWS Lambda", "CloudFormation", "Kubernetes"]),
    ("machine learning", &["MLOps", "PyTorch", "Feature Engineering", "Model Deployment"]),
    ("tensorflow", &["PyTorch", "MLOps", "Model Deployment"]),
    ("pandas", &["NumPy", "Data Visualization", "Airflow"]),
    ("rust", &["Tokio", "WebAssembly", "gRPC", "Systems Programming"]),
    ("git", &["GitHub Actions", "CI/CD", "Code Review"]),
    ("django", &["Django REST Framework", "Celery", "PostgreSQL", "Redis"]),
    ("linux", &["Bash", "Networking", "systemd"]),
];

/// Matched as whole words against the lower-cased role. Role type first, then
/// seniority, then industry.
const ROLE_SKILLS: &[(&str, &[&str])] = &[
    ("data engineer", &["Airflow", "Spark", "dbt", "Kafka", "Data Modeling", "Snowflake"]),
    ("data scientist", &["Statistics", "scikit-learn", "Feature Engineering", "A/B Testing"]),
    ("machine learning", &["MLOps", "PyTorch", "Model Deployment", "Feature Engineering"]),
    ("backend", &["Docker", "Kubernetes", "PostgreSQL", "Redis", "Microservices"]),
    ("frontend", &["TypeScript", "React", "Accessibility", "Web Performance", "Jest"]),
    ("full stack", &["TypeScript", "React", "Node.js", "PostgreSQL", "Docker"]),
    ("devops", &["Terraform", "Kubernetes", "Prometheus", "CI/CD", "Incident Response"]),
    ("sre", &["Prometheus", "Incident Response", "Kubernetes", "Chaos Engineering"]),
    ("mobile", &["Kotlin", "Swift", "Flutter", "Mobile CI/CD"]),
    ("security", &["Threat Modeling", "OWASP", "Penetration Testing", "IAM"]),
    ("cloud", &["AWS", "Terraform", "Kubernetes", "Cloud Cost Optimization"]),
    ("senior", &["System Design", "Technical Leadership", "Mentoring"]),
    ("lead", &["System Design", "Technical Leadership", "Stakeholder Management"]),
    ("principal", &["System Design", "Architecture Documentation", "Technical Strategy"]),
    ("junior", &["Git", "Unit Testing", "Debugging", "Code Review"]),
    ("fintech", &["PCI DSS Compliance", "Secure Coding", "Fraud Detection"]),
    ("banking", &["PCI DSS Compliance", "Secure Coding", "Risk Modeling"]),
    ("healthcare", &["HIPAA Compliance", "Data Privacy", "HL7 FHIR"]),
];

const GENERIC_SKILLS: &[&str] = &[
    "System Design", "Docker", "Unit Testing", "CI/CD", "Cloud Fundamentals", "Git",
];

const HIGH_DEMAND: &[&str] = &[
    "python", "sql", "aws", "kubernetes", "docker", "react", "typescript", "rust",
    "machine learning", "terraform", "pytorch", "data analysis", "golang",
];

pub struct HeuristicBackend;

#[async_trait]
impl SkillIntelligenceBackend for HeuristicBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Heuristic
    }

    async fn generate(&self, request: &GenerationRequest) -> Result<String, BackendError> {
        let value = match &request.task {
            SkillTask::Extraction { resume_text } => json!(extract_known_skills(resume_text)),
            SkillTask::Recommendation {
                existing,
                role,
                limit,
            } => json!(recommend(existing, role.as_deref(), *limit)),
            SkillTask::Roadmap { skills } => roadmap(skills),
            SkillTask::MarketAnalysis { skills } => market_analysis(skills),
            SkillTask::ProjectIdeas { skills, role } => project_ideas(skills, role.as_deref()),
        };
        Ok(value.to_string())
    }
}

/// Whole-word, case-insensitive dictionary scan. Order follows the dictionary.
pub fn extract_known_skills(text: &str) -> Vec<String> {
    let haystack = text.to_lowercase();
    KNOWN_SKILLS
        .iter()
        .filter(|skill| mentions(&haystack, &skill.to_lowercase()))
        .map(|skill| skill.to_string())
        .collect()
}

pub fn recommend(existing: &[String], role: Option<&str>, limit: usize) -> Vec<String> {
    let known: SkillSet = existing.iter().collect();
    let mut picks = SkillSet::new();

    let role_rows = role.map(str::to_lowercase).map(|role| {
        ROLE_SKILLS
            .iter()
            .filter(|(keyword, _)| mentions(&role, keyword))
            .flat_map(|(_, skills)| skills.iter().copied())
            .collect::<Vec<_>>()
    });

    let candidates = role_rows
        .into_iter()
        .flatten()
        .chain(existing.iter().flat_map(|s| related(s).iter().copied()))
        .chain(GENERIC_SKILLS.iter().copied());

    for candidate in candidates {
        if picks.len() >= limit {
            break;
        }
        if !known.contains(candidate) {
            picks.insert(candidate);
        }
    }
    picks.into_vec()
}

fn roadmap(skills: &[String]) -> Value {
    let mut roadmap = serde_json::Map::new();
    for skill in skills {
        let next = related(skill).first().copied().unwrap_or("a complementary tool");
        roadmap.insert(
            skill.clone(),
            json!({
                "levels": [
                    {
                        "level": "Beginner",
                        "description": format!("Core concepts and everyday usage of {skill}."),
                        "projects": [
                            format!("Complete an official {skill} getting-started tutorial"),
                            format!("Build a small personal tool with {skill}")
                        ],
                        "resources": [format!("Official {skill} documentation"), "freeCodeCamp"],
                        "timeframe": "1-2 months"
                    },
                    {
                        "level": "Intermediate",
                        "description": format!("Idiomatic {skill} in real projects, testing and debugging."),
                        "projects": [
                            format!("Build a multi-feature application using {skill} and {next}"),
                            format!("Contribute a fix to an open-source {skill} project")
                        ],
                        "resources": [format!("{skill} community guides"), "Exercism"],
                        "timeframe": "2-3 months"
                    },
                    {
                        "level": "Advanced",
                        "description": format!("Performance, architecture and production operation of {skill}."),
                        "projects": [
                            format!("Design and deploy a production-style system centred on {skill}"),
                            format!("Write a technical deep-dive on a {skill} internals topic")
                        ],
                        "resources": [format!("{skill} conference talks"), "Engineering blogs"],
                        "timeframe": "3-6 months"
                    }
                ],
                "prerequisites": ["Basic programming knowledge"],
                "market_relevance": demand_note(skill)
            }),
        );
    }
    json!({ "roadmap": roadmap })
}

fn market_analysis(skills: &[String]) -> Value {
    let mut analysis = serde_json::Map::new();
    for skill in skills {
        let high = is_high_demand(skill);
        analysis.insert(
            skill.clone(),
            json!({
                "relevance_score": if high { 8 } else { 5 },
                "trend": if high { "growing" } else { "stable" },
                "industries": [],
                "related_roles": [],
                "complementary_skills": related(skill),
                "insights": demand_note(skill)
            }),
        );
    }
    json!({ "skills": analysis })
}

fn project_ideas(skills: &[String], role: Option<&str>) -> Value {
    let audience = role
        .map(|r| format!(" aimed at a {r} position"))
        .unwrap_or_default();
    let projects: Vec<Value> = skills
        .iter()
        .take(3)
        .map(|skill| {
            let mut stack = vec![skill.clone()];
            stack.extend(related(skill).iter().take(2).map(|s| s.to_string()));
            json!({
                "title": format!("{skill} showcase project"),
                "description": format!(
                    "Design, build and document a small production-style application centred on {skill}{audience}. Include automated tests and a deployment guide."
                ),
                "stack": stack,
                "skills": [skill]
            })
        })
        .collect();
    json!({ "projects": projects })
}

fn related(skill: &str) -> &'static [&'static str] {
    let key = skill_key(skill);
    RELATED_SKILLS
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, related)| *related)
        .unwrap_or(&[])
}

fn is_high_demand(skill: &str) -> bool {
    HIGH_DEMAND.contains(&skill_key(skill).as_str())
}

fn demand_note(skill: &str) -> String {
    if is_high_demand(skill) {
        format!("{skill} appears in a large share of current job postings (static estimate; live market data unavailable).")
    } else {
        format!("{skill} has steady demand in specialised roles (static estimate; live market data unavailable).")
    }
}

/// Substring match that requires non-alphanumeric neighbours, so `java` does not
/// hit `javascript` and `sql` does not hit `postgresql`.
fn mentions(haystack: &str, needle: &str) -> bool {
    if needle.is_empty() {
        return false;
    }
    haystack.match_indices(needle).any(|(start, _)| {
        let before = haystack[..start].chars().next_back();
        let after = haystack[start + needle.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::json_recovery::{recover_json, string_list};

    #[test]
    fn test_extract_respects_word_boundaries() {
        let text = "Built services in JavaScript and PostgreSQL; some C++ and Node.js.";
        let found = extract_known_skills(text);
        assert!(found.contains(&"JavaScript".to_string()));
        assert!(found.contains(&"PostgreSQL".to_string()));
        assert!(found.contains(&"C++".to_string()));
        assert!(found.contains(&"Node.js".to_string()));
        assert!(!found.contains(&"Java".to_string()));
        assert!(!found.contains(&"SQL".to_string()));
    }

    #[test]
    fn test_extract_nothing_from_plain_prose() {
        assert!(extract_known_skills("I enjoy hiking and cooking.").is_empty());
    }

    #[test]
    fn test_recommend_uses_role_and_excludes_existing() {
        let existing = vec!["Python".to_string(), "sql".to_string()];
        let recs = recommend(&existing, Some("Senior Data Engineer"), 5);
        assert_eq!(recs.len(), 5);
        assert_eq!(recs[0], "Airflow");
        assert!(recs.iter().all(|r| {
            let key = skill_key(r);
            key != "python" && key != "sql"
        }));
    }

    #[test]
    fn test_recommend_industry_keywords() {
        let recs = recommend(&[], Some("fintech backend engineer"), 8);
        assert!(recs.contains(&"PCI DSS Compliance".to_string()));
        assert!(recs.contains(&"Docker".to_string()));
    }

    #[test]
    fn test_recommend_without_role_falls_back_to_related_then_generic() {
        let recs = recommend(&["Rust".to_string()], None, 6);
        assert_eq!(&recs[..4], &["Tokio", "WebAssembly", "gRPC", "Systems Programming"]);
        assert_eq!(recs.len(), 6);
    }

    #[tokio::test]
    async fn test_every_task_yields_recoverable_json() {
        let tasks = vec![
            SkillTask::Extraction {
                resume_text: "Python and Docker".into(),
            },
            SkillTask::Recommendation {
                existing: vec!["Python".into()],
                role: Some("Backend Engineer".into()),
                limit: 5,
            },
            SkillTask::Roadmap {
                skills: vec!["rust".into()],
            },
            SkillTask::MarketAnalysis {
                skills: vec!["python".into(), "cobol".into()],
            },
            SkillTask::ProjectIdeas {
                skills: vec!["react".into()],
                role: None,
            },
        ];

        for task in tasks {
            let request = GenerationRequest {
                task,
                prompt: String::new(),
                max_tokens: 0,
                temperature: 0.0,
            };
            let text = HeuristicBackend.generate(&request).await.unwrap();
            let value = recover_json(&text).expect("heuristic output must be JSON");
            match &request.task {
                SkillTask::Extraction { .. } => {
                    assert_eq!(string_list(&value).unwrap(), vec!["Python", "Docker"])
                }
                SkillTask::Recommendation { .. } => assert!(value.is_array()),
                SkillTask::Roadmap { .. } => {
                    assert_eq!(value["roadmap"]["rust"]["levels"].as_array().unwrap().len(), 3)
                }
                SkillTask::MarketAnalysis { .. } => {
                    assert_eq!(value["skills"]["python"]["trend"], "growing");
                    assert_eq!(value["skills"]["cobol"]["relevance_score"], 5);
                }
                SkillTask::ProjectIdeas { .. } => {
                    assert_eq!(value["projects"].as_array().unwrap().len(), 1)
                }
            }
        }
    }
}
