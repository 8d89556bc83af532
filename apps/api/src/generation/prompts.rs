// Prompt template and builder for STAR report generation.
// The generated reports are written in Traditional Chinese for airport duty-free staff,
// so the template is in the same language.

use crate::generation::competencies::{category_label_by_code, competency_profile_by_code};

/// STAR generation prompt.
/// Replace: {category}, {competency}, {competency_details}, {story}
pub const STAR_PROMPT_TEMPLATE: &str = r#"你是一位擅長撰寫 STAR 工作報告的顧問，協助機場免稅店{category}部門員工用自然、真實、有條理的方式撰寫工作回顧，語言使用中文，風格清楚、具體、口語化，不要過於誇大、不要過於 AI 感，適合上交給主管評核。每個部分回覆的字數必須在50-100字之間，回覆內容不需要說明"我是{category}員工等自我介紹"。

請分析以下員工提供的工作經歷，並根據STAR方法(情境Situation、任務Task、行動Action、結果Result)重新組織內容，突顯員工在「{competency}」這項核心職能上的表現。作為免稅店{category}部門的員工，請確保描述適合免稅店零售專業環境。{competency_details}

員工提供的工作經歷:
{story}

請以JSON格式回覆，只回覆一個扁平的JSON物件，不要巢狀結構，不要加上任何其他文字，格式如下:
{
  "situation": "情境描述（50-100字）",
  "task": "任務描述（50-100字）",
  "action": "行動描述（50-100字）",
  "result": "結果描述（50-100字）"
}"#;

/// Competency block appended to the instructions when the code is known.
/// Replace: {name}, {definition}, {behaviors}
const COMPETENCY_DETAILS_TEMPLATE: &str = "\n\n【{name} 職能定義】\n{definition}\n\n【關鍵行為】\n{behaviors}";

/// Builds the STAR generation prompt.
///
/// Pure and deterministic. Unknown competency or category codes are used verbatim as their
/// label and never cause an error; an unknown competency simply gets no definition block.
pub fn build_star_prompt(story: &str, competency_code: &str, category_code: &str) -> String {
    let category = category_label_by_code(category_code).unwrap_or(category_code);

    let (competency, competency_details) = match competency_profile_by_code(competency_code) {
        Some(profile) => {
            let behaviors = profile
                .key_behaviors
                .iter()
                .enumerate()
                .map(|(i, behavior)| format!("{}. {}", i + 1, behavior))
                .collect::<Vec<_>>()
                .join("\n");
            let details = fill_template(
                COMPETENCY_DETAILS_TEMPLATE,
                &[
                    ("{name}", profile.name),
                    ("{definition}", profile.definition),
                    ("{behaviors}", behaviors.as_str()),
                ],
            );
            (profile.name, details)
        }
        None => (competency_code, String::new()),
    };

    fill_template(
        STAR_PROMPT_TEMPLATE,
        &[
            ("{category}", category),
            ("{competency_details}", competency_details.as_str()),
            ("{competency}", competency),
            ("{story}", story),
        ],
    )
}

/// Substitutes placeholders in a single left-to-right pass over `template`.
/// Inserted values are never rescanned, so braces inside them stay literal.
fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find('{') {
        out.push_str(&rest[..start]);
        let tail = &rest[start..];
        match values.iter().find(|(key, _)| tail.starts_with(key)) {
            Some((key, value)) => {
                out.push_str(value);
                rest = &tail[key.len()..];
            }
            None => {
                out.push('{');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
