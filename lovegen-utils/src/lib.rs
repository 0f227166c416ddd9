pub const CODE_FENCE: &str = "```";
pub const LUA_CODE_FENCE: &str = "```lua";

/// Strip the markdown code fence a model tends to wrap generated source in.
///
/// At most one opening marker is removed, and only at the very start of the
/// text: the `lua`-tagged one is tried first, the bare one only if it was
/// absent, since checking the bare marker first would leave the `lua` tag
/// behind. At most one closing marker is then removed, ignoring trailing
/// whitespace after it, and the remainder trimmed.
pub fn strip_code_fences(text: &str) -> String {
    let mut body = text;

    if let Some(rest) = body.strip_prefix(LUA_CODE_FENCE) {
        body = rest;
    } else if let Some(rest) = body.strip_prefix(CODE_FENCE) {
        body = rest;
    }

    body = body.trim_end();
    if let Some(rest) = body.strip_suffix(CODE_FENCE) {
        body = rest;
    }

    body.trim().to_string()
}

pub fn trimmed_or_none(input: Option<&str>) -> Option<&str> {
    input.and_then(|value| {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed)
        }
    })
}
