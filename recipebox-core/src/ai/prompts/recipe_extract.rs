//! Prompt templates for extracting a recipe from photos or pasted text.

/// Tags the model may choose from.
pub const TAG_VOCABULARY: &[&str] = &[
    "Bread",
    "Breakfast",
    "Dessert",
    "Dinner",
    "Dressing",
    "Mix",
    "Snack",
];

fn formatting_rules() -> String {
    format!(
        r#"Preserve as much of the original text of the recipe as possible except where it violates these formatting guidelines.

Use **bold** for emphasis where indicated by the recipe.

Ingredients: Formatted in Markdown as one or more unordered lists (some recipes have multiple ingredient lists)
Each ingredient should:
Begin with an asterisk followed by a space '* '
End with a newline (press 'Enter' after each ingredient)

Instructions: Formatted in Markdown as one or more ordered lists (some recipes have multiple instruction lists)
Each instruction should:
Begin with an incrementing number followed by a period and a space (e.g., '1. ')
End with a newline (press 'Enter' after each instruction)

Tags: Assign a single tag from the following list, if relevant: [{}]. If none apply, leave the tag field empty."#,
        TAG_VOCABULARY.join(", ")
    )
}

pub fn render_image_extract_prompt() -> String {
    format!(
        "Analyze the attached recipe images. Respond with the provided schema using the following guidelines:\n\n{}",
        formatting_rules()
    )
}

pub fn render_text_extract_prompt() -> String {
    format!(
        "Analyze the recipe text that follows. Respond with the provided schema using the following guidelines:\n\n{}",
        formatting_rules()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompts_list_the_tag_vocabulary() {
        for prompt in [render_image_extract_prompt(), render_text_extract_prompt()] {
            assert!(prompt.contains("[Bread, Breakfast, Dessert, Dinner, Dressing, Mix, Snack]"));
            assert!(prompt.contains("'* '"));
            assert!(prompt.contains("'1. '"));
        }
    }
}
