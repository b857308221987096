use crate::decode::STANCE_KEYS;
use crate::encode::EncodedContext;
use crate::llm::GenerativeRequest;
use animus_core::{Agent, Horizon, IntentionKind};

/// Fixed rules sent with every request. The vocabulary lines are filled in
/// from the decode tables so the two never disagree.
const INSTRUCTION_CONTRACT: &str = "You voice the inner life of the character described below.\n\
Speak about feelings and people in plain words. Never state numbers, scores, levels or percentages for any feeling, need or relationship.\n\
Never redefine who the character is or tell them to become someone else. Change happens gradually.\n\
\n\
Reply with a single JSON object:\n\
{\"text\": \"...\", \"stance_shifts\": [{\"counterpart\": \"<name>\", \"stance\": \"<stance>\"}], \"intention_updates\": [{\"operation\": \"<operation>\", \"type\": \"<type>\", \"description\": \"...\", \"horizon\": \"<horizon>\"}]}\n\
Both lists may be empty. Use only names that appear under PEOPLE.";

pub struct ContextAssembler;

impl ContextAssembler {
    pub fn instructions() -> String {
        let intention_types: Vec<&str> = IntentionKind::GENERATIVE.iter().map(|k| k.as_str()).collect();
        let horizons: Vec<&str> = [Horizon::Short, Horizon::Medium, Horizon::Long]
            .iter()
            .map(|h| h.as_str())
            .collect();
        format!(
            "{}\n\nstance: one of {}\noperation: one of create, boost, lower, drop\ntype: one of {}\nhorizon: one of {}",
            INSTRUCTION_CONTRACT,
            STANCE_KEYS.join(", "),
            intention_types.join(", "),
            horizons.join(", "),
        )
    }

    pub fn build_request(agent: &Agent, context: &EncodedContext) -> GenerativeRequest {
        GenerativeRequest {
            agent_id: agent.id.clone(),
            instructions: Self::instructions(),
            context: context.render(),
        }
    }
}
