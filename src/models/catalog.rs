// file: src/models/catalog.rs
// description: well-known models suggested for download

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuggestedModel {
    pub name: &'static str,
    pub description: &'static str,
}

pub static SUGGESTED_MODELS: [SuggestedModel; 4] = [
    SuggestedModel {
        name: "llama2",
        description: "Meta Llama 2 - General purpose model",
    },
    SuggestedModel {
        name: "codellama",
        description: "Code Llama - Specialized for coding",
    },
    SuggestedModel {
        name: "mistral",
        description: "Mistral 7B - Fast and efficient",
    },
    SuggestedModel {
        name: "neural-chat",
        description: "Intel Neural Chat - Conversational AI",
    },
];

pub fn find_suggested(name: &str) -> Option<&'static SuggestedModel> {
    SUGGESTED_MODELS.iter().find(|model| model.name == name)
}
