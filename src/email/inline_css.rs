//! 把 `<style>` 區塊中的規則搬進各元素的 `style` 屬性。
//!
//! 許多郵件客戶端會移除 `<head>` 中的樣式，所以範本產生的 HTML 都要經過
//! 這一步。只處理 `tag`、`.class`、`tag.class` 這三種簡單選擇器（可用逗號
//! 串接）；`@media` 與其他複雜選擇器原樣保留在剩下的 `<style>` 中。

use regex::{Captures, Regex};
use std::sync::OnceLock;

const SKIPPED_TAGS: [&str; 6] = ["html", "head", "meta", "title", "style", "link"];

fn style_block_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?is)<style[^>]*>(.*?)</style>").expect("static pattern"))
}

fn comment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)/\*.*?\*/").expect("static pattern"))
}

fn open_tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<([a-zA-Z][a-zA-Z0-9]*)((?:\s+[^<>]*?)?)(\s*/?)>"#).expect("static pattern")
    })
}

fn attr_re(name: &str) -> Regex {
    // name 只會是 class / style
    Regex::new(&format!(r#"(?i)\s{}\s*=\s*"([^"]*)""#, name)).expect("static pattern")
}

#[derive(Debug, Clone, PartialEq)]
enum Selector {
    Tag(String),
    Class(String),
    TagClass(String, String),
}

impl Selector {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let valid = |s: &str| {
            !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        };

        match raw.split_once('.') {
            None if valid(raw) => Some(Selector::Tag(raw.to_ascii_lowercase())),
            Some(("", class)) if valid(class) => Some(Selector::Class(class.to_string())),
            Some((tag, class)) if valid(tag) && valid(class) => {
                Some(Selector::TagClass(tag.to_ascii_lowercase(), class.to_string()))
            }
            _ => None,
        }
    }

    fn specificity(&self) -> u32 {
        match self {
            Selector::Tag(_) => 1,
            Selector::Class(_) => 10,
            Selector::TagClass(_, _) => 11,
        }
    }

    fn matches(&self, tag: &str, classes: &[&str]) -> bool {
        match self {
            Selector::Tag(t) => t == tag,
            Selector::Class(c) => classes.contains(&c.as_str()),
            Selector::TagClass(t, c) => t == tag && classes.contains(&c.as_str()),
        }
    }
}

#[derive(Debug, Clone)]
struct Rule {
    selector: Selector,
    declarations: Vec<(String, String)>,
    order: usize,
}

fn parse_declarations(body: &str) -> Vec<(String, String)> {
    body.split(';')
        .filter_map(|decl| decl.split_once(':'))
        .map(|(prop, value)| (prop.trim().to_ascii_lowercase(), value.trim().replace('"', "'")))
        .filter(|(prop, value)| !prop.is_empty() && !value.is_empty())
        .collect()
}

/// 依大括號深度切出最上層的區塊：(前導文字, 內容)
fn top_level_blocks(css: &str) -> Vec<(String, String)> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut header = String::new();
    let mut body = String::new();

    for ch in css.chars() {
        match ch {
            '{' => {
                if depth > 0 {
                    body.push(ch);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    blocks.push((header.trim().to_string(), body.trim().to_string()));
                    header.clear();
                    body.clear();
                } else {
                    body.push(ch);
                }
            }
            _ if depth == 0 => header.push(ch),
            _ => body.push(ch),
        }
    }
    blocks
}

/// 回傳 (可內嵌的規則, 需保留在 `<style>` 的 CSS)
fn parse_stylesheet(css: &str) -> (Vec<Rule>, String) {
    let css = comment_re().replace_all(css, "");
    let mut rules = Vec::new();
    let mut residual = String::new();
    let mut order = 0;

    for (header, body) in top_level_blocks(&css) {
        if header.starts_with('@') {
            residual.push_str(&format!("{} {{ {} }}\n", header, body));
            continue;
        }

        let declarations = parse_declarations(&body);
        let mut unsupported = Vec::new();
        for raw in header.split(',') {
            match Selector::parse(raw) {
                Some(selector) => {
                    rules.push(Rule {
                        selector,
                        declarations: declarations.clone(),
                        order,
                    });
                    order += 1;
                }
                None => unsupported.push(raw.trim()),
            }
        }

        if !unsupported.is_empty() {
            residual.push_str(&format!("{} {{ {} }}\n", unsupported.join(", "), body));
        }
    }

    (rules, residual)
}

fn merge_into(target: &mut Vec<(String, String)>, declarations: &[(String, String)]) {
    for (prop, value) in declarations {
        match target.iter_mut().find(|(p, _)| p == prop) {
            Some(existing) => existing.1 = value.clone(),
            None => target.push((prop.clone(), value.clone())),
        }
    }
}

fn inline_tag(caps: &Captures<'_>, rules: &[Rule], class_re: &Regex, style_re: &Regex) -> String {
    let whole = &caps[0];
    let tag = caps[1].to_ascii_lowercase();
    if SKIPPED_TAGS.contains(&tag.as_str()) {
        return whole.to_string();
    }

    let attrs = caps.get(2).map(|m| m.as_str()).unwrap_or("");
    let closing = caps.get(3).map(|m| m.as_str()).unwrap_or("");

    let class_attr = class_re
        .captures(attrs)
        .map(|c| c[1].to_string())
        .unwrap_or_default();
    let classes: Vec<&str> = class_attr.split_whitespace().collect();

    let mut matched: Vec<&Rule> = rules
        .iter()
        .filter(|r| r.selector.matches(&tag, &classes))
        .collect();
    if matched.is_empty() {
        return whole.to_string();
    }
    matched.sort_by_key(|r| (r.selector.specificity(), r.order));

    let mut declarations = Vec::new();
    for rule in matched {
        merge_into(&mut declarations, &rule.declarations);
    }

    // 原本就寫在元素上的樣式優先
    let existing = style_re.captures(attrs).map(|c| c[1].to_string());
    if let Some(existing) = &existing {
        merge_into(&mut declarations, &parse_declarations(existing));
    }

    let style = declarations
        .iter()
        .map(|(p, v)| format!("{}: {}", p, v))
        .collect::<Vec<_>>()
        .join("; ");
    let attrs_without_style = style_re.replace(attrs, "");

    format!(
        "<{}{} style=\"{};\"{}>",
        &caps[1],
        attrs_without_style.trim_end(),
        style,
        closing
    )
}

pub fn inline_css(html: &str) -> String {
    let mut css = String::new();
    for caps in style_block_re().captures_iter(html) {
        css.push_str(&caps[1]);
        css.push('\n');
    }
    if css.trim().is_empty() {
        return html.to_string();
    }

    let (rules, residual) = parse_stylesheet(&css);

    // 第一個 <style> 換成保留下來的規則，其餘移除
    let mut replaced_first = false;
    let without_styles = style_block_re().replace_all(html, |_: &Captures<'_>| {
        if replaced_first || residual.trim().is_empty() {
            String::new()
        } else {
            replaced_first = true;
            format!("<style type=\"text/css\">\n{}</style>", residual)
        }
    });

    let class_re = attr_re("class");
    let style_re = attr_re("style");

    let (head, body) = match without_styles.find("<body") {
        Some(idx) => without_styles.split_at(idx),
        None => ("", without_styles.as_ref()),
    };

    let inlined = open_tag_re().replace_all(body, |caps: &Captures<'_>| {
        inline_tag(caps, &rules, &class_re, &style_re)
    });

    format!("{}{}", head, inlined)
}
