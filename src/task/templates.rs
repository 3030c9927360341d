use crate::task::ids::IdGenerator;
use crate::task::types::Subtask;

/// Keyword templates, scanned in this order. The first keyword found wins.
pub const SUBTASK_TEMPLATES: [(&str, [&str; 5]); 5] = [
    ("work", ["Research", "Plan", "Execute", "Review", "Document"]),
    (
        "study",
        [
            "Read materials",
            "Take notes",
            "Practice exercises",
            "Review",
            "Test knowledge",
        ],
    ),
    (
        "exercise",
        ["Warm up", "Main workout", "Cool down", "Stretch", "Hydrate"],
    ),
    (
        "clean",
        ["Declutter", "Dust", "Vacuum", "Organize", "Maintain"],
    ),
    (
        "cook",
        [
            "Plan menu",
            "Buy ingredients",
            "Prep ingredients",
            "Cook",
            "Clean up",
        ],
    ),
];

/// Used when no keyword matches
pub const DEFAULT_TEMPLATE: [&str; 5] = [
    "Break down task",
    "Set milestones",
    "Track progress",
    "Complete",
    "Review",
];

/// Pick the template for `text` by case-insensitive substring match
pub fn template_for(text: &str) -> &'static [&'static str; 5] {
    let lower = text.to_lowercase();
    SUBTASK_TEMPLATES
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|(_, template)| template)
        .unwrap_or(&DEFAULT_TEMPLATE)
}

/// Build fresh, incomplete subtask stubs for `text`
pub fn suggest_subtasks(text: &str, ids: &mut dyn IdGenerator) -> Vec<Subtask> {
    template_for(text)
        .iter()
        .map(|step| Subtask::new(ids.next_id(), *step))
        .collect()
}
