//! Stage instructions for both pipelines.
//!
//! Prompt text is content, not mechanism: the pipelines care only about what
//! each stage is allowed to see, which is decided at the call sites.

/// Stage 1 of the contract pipeline: facts-only extraction, constrained to
/// the assessment schema.
pub fn extract_assessment(narrative: &str) -> String {
    format!(
        "Patient information:\n{narrative}\n\n\
         Extract the symptom assessment from this patient information. \
         Provide ONLY factual observations. Do not include speculation, \
         possible conditions, or uncertain language. Focus on what is \
         directly observed or stated."
    )
}

/// Stage 2 of the contract pipeline. The serialized assessment is embedded
/// here and is the entire channel of information transfer.
pub fn classify_from_assessment(assessment_json: &str) -> String {
    format!(
        "Based on this symptom assessment, classify the triage urgency:\n\
         {assessment_json}\n\n\
         Classify the urgency level and provide reasoning. Use only the \
         factual data provided in the assessment."
    )
}

/// Stage 1 of the vibe pipeline: open-ended analysis, speculation invited.
pub fn open_analysis(narrative: &str) -> String {
    format!(
        "Patient information:\n{narrative}\n\n\
         You are a medical symptom analyzer. Review the patient's symptoms \
         and medical history. Think out loud about what you observe, \
         including any possible conditions or concerns. Discuss what might \
         be happening, what could be serious, and what we should watch for. \
         Provide a detailed analysis for the triage classifier."
    )
}

/// Stage 2 of the vibe pipeline, appended after the full stage-1 history.
pub fn classify_from_history() -> &'static str {
    "You are a medical triage classifier. Based on the symptom analysis \
     above, classify the urgency level. Consider all the information \
     discussed in the conversation."
}
