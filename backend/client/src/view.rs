use std::fmt::Write;

use criteria::{Flow, Importance, flow::Comparing};

pub fn render(flow: &Flow) -> String {
    let mut out = String::new();

    match flow {
        Flow::Ranking(ranking) => {
            out.push_str("Step 1: Rank Criteria by Importance (1 = most important)\n");
            for criterion in ranking.criteria() {
                let rank = criterion
                    .rank
                    .map(|r| r.to_string())
                    .unwrap_or_else(|| "-".to_string());
                let _ = writeln!(out, "  {:<4} {:<16} rank: {rank}", criterion.id, criterion.name);
            }
            out.push_str("Use `rank <id> <1-5>`, then `confirm`.\n");
        }
        Flow::Comparing(comparing) => render_comparing(&mut out, comparing),
        Flow::Submitted(submitted) => {
            out.push_str("Submission Complete!\n");
            let _ = writeln!(out, "{}", submitted.message);
            out.push_str("Type `reset` to submit another response or `quit` to leave.\n");
        }
    }

    out
}

fn render_comparing(out: &mut String, comparing: &Comparing) {
    out.push_str("Step 2: Compare Adjacent Criteria\n");

    let order: Vec<String> = comparing
        .ranked_criteria()
        .iter()
        .enumerate()
        .map(|(i, c)| format!("{}. {}", i + 1, c.name))
        .collect();
    let _ = writeln!(out, "Ranked (most to least important): {}", order.join(", "));

    let Some(current) = comparing.current() else {
        return;
    };

    let _ = writeln!(
        out,
        "Comparison {} of {}",
        comparing.cursor() + 1,
        comparing.comparisons().len()
    );
    let _ = writeln!(
        out,
        "  {} is ______ times more important than {}",
        current.criterion2.name, current.criterion1.name
    );
    let _ = writeln!(
        out,
        "  Current value: {} (scale {} equally important to {} extremely more important)",
        current.importance,
        Importance::MIN,
        Importance::MAX
    );

    if comparing.is_last() {
        out.push_str("Use `set <1-9>`, `prev`, or `submit [1-9]`.\n");
    } else {
        out.push_str("Use `set <1-9>`, `prev`, or `next`.\n");
    }
}
