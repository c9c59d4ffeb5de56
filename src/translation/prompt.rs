// Prompt construction (review → model instruction)
// Author: kelexine (https://github.com/kelexine)

use crate::models::{Language, SourceCategory};

/// Field names the model is asked to produce. The parser looks for the same keys.
pub const USER_FIELD: &str = "user_really_means";
pub const BOSS_FIELD: &str = "boss_hears";

/// Build the instruction sent to the generation model.
///
/// `en` and `zh` have dedicated templates. Every other language reuses the
/// English template plus a line asking for output in that language.
pub fn build_prompt(review: &str, source: SourceCategory, language: Language) -> String {
    match language {
        Language::Zh => chinese_prompt(review, source),
        Language::En => english_prompt(review, source),
        other => format!(
            "{}\n\nWrite both perspectives in {}.",
            english_prompt(review, source),
            other.english_name()
        ),
    }
}

fn english_prompt(review: &str, source: SourceCategory) -> String {
    format!(
        r#"You are a humorous translator of bad reviews. Given a bad review for a {label}, translate it into two perspectives:

1. **What the user REALLY means** (the unfiltered inner monologue — brutally honest, sarcastic, dramatic)
2. **What the boss/developer hears** (the delusional optimistic spin — how management interprets criticism)

Bad review: "{review}"

Respond in this EXACT JSON format (no markdown, no code blocks):
{{"{USER_FIELD}": "...", "{BOSS_FIELD}": "..."}}

Make it funny, exaggerated, and shareable. Each perspective should be 2-4 sentences."#,
        label = source.label_en(),
    )
}

fn chinese_prompt(review: &str, source: SourceCategory) -> String {
    format!(
        r#"你是一个搞笑的差评翻译器。给定一条关于{label}的差评，请翻译成两个视角：

1. **用户真正想说的**（内心OS，不加掩饰，毒舌、夸张、戏剧化）
2. **老板/开发者听到的**（管理层的乐观解读，把批评都当成正面反馈）

差评原文："{review}"

请严格按以下 JSON 格式回答（不要 markdown，不要代码块）：
{{"{USER_FIELD}": "...", "{BOSS_FIELD}": "..."}}

要搞笑、夸张、有梗，让人想分享。每个视角 2-4 句话。"#,
        label = source.label_zh(),
    )
}
