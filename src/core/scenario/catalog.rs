//! Built-In Scenario Catalog

use crate::core::scenario::{
    DecisionOption, FollowUp, ImpactLevel, Inbrief, Scenario, ScenarioStep,
};

/// All built-in scenarios.
pub fn all() -> Vec<Scenario> {
    vec![data_breach(), product_recall()]
}

/// Look up a built-in scenario by id.
pub fn by_id(id: &str) -> Option<Scenario> {
    all().into_iter().find(|s| s.id == id)
}

pub fn data_breach() -> Scenario {
    Scenario {
        id: "data-breach".to_string(),
        category: "cyber".to_string(),
        theme: "Customer Data Exposed in Security Incident".to_string(),
        inbrief: Inbrief {
            title: "Customer Database Breach".to_string(),
            summary: "An attacker has exfiltrated records from the customer database. \
                      The scope is unconfirmed and a security researcher is already \
                      asking questions on social media."
                .to_string(),
            objectives: vec![
                "Establish the scope of the breach".to_string(),
                "Protect public trust through honest communication".to_string(),
                "Keep internal teams aligned and functional".to_string(),
            ],
            stakeholders: vec![
                "Operations Team".to_string(),
                "Legal".to_string(),
                "Press Desk".to_string(),
                "Government Liaison".to_string(),
            ],
            resources: vec![
                "Incident response retainer".to_string(),
                "Draft holding statement".to_string(),
            ],
            initial_situation: "The security operations centre confirmed unusual database \
                                egress forty minutes ago. Nothing is public yet."
                .to_string(),
        },
        steps: vec![
            ScenarioStep {
                id: "initial".to_string(),
                description: "First reports are arriving. How do you respond?".to_string(),
                options: vec![
                    DecisionOption {
                        text: "Monitor the situation".to_string(),
                        impact: ImpactLevel::Low,
                        next_step: Some("escalating".to_string()),
                        consequence: "The story develops without your voice in it.".to_string(),
                        follow_up: None,
                    },
                    DecisionOption {
                        text: "Issue a public statement".to_string(),
                        impact: ImpactLevel::High,
                        next_step: Some("escalating".to_string()),
                        consequence: "You are on the record before the facts are settled."
                            .to_string(),
                        follow_up: Some(FollowUp {
                            prompt: "Draft the key message of your statement.".to_string(),
                            validation: Some("length:300".to_string()),
                        }),
                    },
                    DecisionOption {
                        text: "Activate the crisis response team".to_string(),
                        impact: ImpactLevel::Medium,
                        next_step: Some("escalating".to_string()),
                        consequence: "Response capacity online; the clock keeps running."
                            .to_string(),
                        follow_up: None,
                    },
                ],
                time_limit_secs: Some(120),
            },
            ScenarioStep {
                id: "escalating".to_string(),
                description: "A journalist has the story and regulators are aware."
                    .to_string(),
                options: vec![
                    DecisionOption {
                        text: "Hold a press conference".to_string(),
                        impact: ImpactLevel::High,
                        next_step: None,
                        consequence: "Every question gets asked, on camera.".to_string(),
                        follow_up: Some(FollowUp {
                            prompt: "What is your opening line?".to_string(),
                            validation: Some("length:200".to_string()),
                        }),
                    },
                    DecisionOption {
                        text: "Engage legal counsel".to_string(),
                        impact: ImpactLevel::Medium,
                        next_step: None,
                        consequence: "Answers slow down while exposure is assessed.".to_string(),
                        follow_up: None,
                    },
                ],
                time_limit_secs: Some(180),
            },
        ],
    }
}

pub fn product_recall() -> Scenario {
    Scenario {
        id: "product-recall".to_string(),
        category: "operations".to_string(),
        theme: "Safety Concerns Force Nationwide Product Recall".to_string(),
        inbrief: Inbrief {
            title: "Defective Batch Recall".to_string(),
            summary: "Field reports link a production batch to overheating failures. \
                      A recall decision is pending while complaints accumulate."
                .to_string(),
            objectives: vec![
                "Decide the recall scope quickly".to_string(),
                "Keep retail partners supplied with accurate guidance".to_string(),
            ],
            stakeholders: vec![
                "Operations Team".to_string(),
                "Retail Partners".to_string(),
                "Press Desk".to_string(),
            ],
            resources: vec!["Batch traceability data".to_string()],
            initial_situation: "Quality engineering has isolated the suspect batch; \
                                three injury claims are unverified."
                .to_string(),
        },
        steps: vec![ScenarioStep {
            id: "initial".to_string(),
            description: "Complaints are rising. What is your first move?".to_string(),
            options: vec![
                DecisionOption {
                    text: "Brief internal teams".to_string(),
                    impact: ImpactLevel::Low,
                    next_step: None,
                    consequence: "Staff hear it from you before the press.".to_string(),
                    follow_up: None,
                },
                DecisionOption {
                    text: "Issue a public statement".to_string(),
                    impact: ImpactLevel::High,
                    next_step: None,
                    consequence: "The recall becomes the day's business story.".to_string(),
                    follow_up: Some(FollowUp {
                        prompt: "State what customers should do with affected units."
                            .to_string(),
                        validation: Some("length:300".to_string()),
                    }),
                },
            ],
            time_limit_secs: Some(120),
        }],
    }
}
