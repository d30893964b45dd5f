//! Read-only statement check for model-written SQL.

/// Leading keywords of statements that never write.
const READ_ONLY: &[&str] = &[
    "select", "with", "show", "describe", "desc", "explain", "pragma",
];

/// Whether `sql` is a single statement that only reads.
///
/// Comments are skipped. Semicolons inside quoted strings or identifiers
/// do not split statements; a trailing semicolon is allowed.
pub fn is_read_only(sql: &str) -> bool {
    let sql = skip_comments(sql);
    let keyword: String = sql
        .chars()
        .take_while(|c| c.is_ascii_alphabetic())
        .collect::<String>()
        .to_ascii_lowercase();

    READ_ONLY.contains(&keyword.as_str()) && statement_count(sql) == 1
}

fn skip_comments(mut sql: &str) -> &str {
    loop {
        sql = sql.trim_start();
        if let Some(rest) = sql.strip_prefix("--") {
            sql = rest.split_once('\n').map_or("", |(_, tail)| tail);
        } else if let Some(rest) = sql.strip_prefix("/*") {
            sql = rest.split_once("*/").map_or("", |(_, tail)| tail);
        } else {
            return sql;
        }
    }
}

fn statement_count(sql: &str) -> usize {
    let mut count = 0;
    let mut quote = None;
    let mut pending = false;
    let mut chars = sql.chars().peekable();
    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            if c == q {
                quote = None;
            }
            continue;
        }

        match c {
            '\'' | '"' | '`' => {
                quote = Some(c);
                pending = true;
            }
            '-' if chars.peek() == Some(&'-') => {
                while chars.next_if(|c| *c != '\n').is_some() {}
            }
            // Only MySQL reads `#` as a comment, so a `;` still ends it.
            '#' => {
                while chars.next_if(|c| *c != '\n' && *c != ';').is_some() {}
            }
            '/' if chars.peek() == Some(&'*') => {
                chars.next();
                let mut star = false;
                for c in chars.by_ref() {
                    if star && c == '/' {
                        break;
                    }
                    star = c == '*';
                }
            }
            ';' => {
                if pending {
                    count += 1;
                }
                pending = false;
            }
            c if !c.is_whitespace() => pending = true,
            _ => {}
        }
    }
    count + usize::from(pending)
}
