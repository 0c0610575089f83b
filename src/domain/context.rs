// Short labels describing where a call happens (branch, loop, try block).

use crate::domain::symbol::ExecutionContext;

/// Conditions longer than this are shown as plain "conditional".
pub const MAX_CONDITION_LEN: usize = 20;

/// Render the context flags of a call as `" [if x, loop]"`, or `""` when no flag is set.
pub fn annotate(ctx: &ExecutionContext) -> String {
    let mut parts: Vec<String> = Vec::new();

    if ctx.is_conditional {
        match ctx.condition.as_deref() {
            Some(cond) if cond.chars().count() <= MAX_CONDITION_LEN => {
                parts.push(format!("if {}", cond));
            }
            _ => parts.push("conditional".to_string()),
        }
    }
    if ctx.is_loop {
        parts.push("loop".to_string());
    }
    if ctx.is_try_block {
        parts.push("try".to_string());
    }

    if parts.is_empty() {
        String::new()
    } else {
        format!(" [{}]", parts.join(", "))
    }
}
