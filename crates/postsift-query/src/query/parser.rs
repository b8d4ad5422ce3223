//! Parser for boolean query expressions.

use tracing::debug;

use super::ast::{ConditionNode, OperatorKind};
use super::error::{QueryError, QueryResult};
use super::normalize::normalize_query;
use super::pattern::compile_word;

/// Parser for query expressions.
///
/// Parenthesized groups are resolved innermost first: each group is parsed on
/// its own, stored in a table local to the parse call and replaced in the
/// working query by a `:<index>:` reference. A paren-free level is then split
/// on the first operator kind found, in the fixed order `OR`, `AND`, `NOT`,
/// `NEAR/<n>`.
///
/// # Grammar
///
/// ```text
/// expr          ::= term (SEP term)* | "(" expr ")"
/// SEP           ::= "OR" | "AND" | "NOT" | "NEAR/" digits
/// term          ::= literal | quoted_phrase | "(" expr ")"
/// literal       ::= any run of characters ('?' one char, '*' non-space run)
/// quoted_phrase ::= '"' ... '"'
/// ```
///
/// Only one operator kind is structural per level. Within an operand of that
/// level, other keywords are ordinary words, so `a OR b AND c` is the OR of
/// `a` and the literal phrase `b and c`. Mixing operators needs parentheses.
/// A quoted keyword, such as `"or"`, is always a literal word.
///
/// # Example
///
/// ```
/// use postsift_query::query::{ConditionNode, QueryParser};
///
/// let tree = QueryParser::parse("(camera OR lens) AND galaxy").unwrap();
/// assert!(matches!(tree, ConditionNode::And(_)));
/// assert_eq!(tree.to_string(), "(camera OR lens) AND galaxy");
/// ```
pub struct QueryParser {
    groups: Vec<Option<ConditionNode>>,
}

impl QueryParser {
    /// Parses a raw query into a condition tree.
    ///
    /// The query is normalized first (see
    /// [`normalize_query`](super::normalize_query)). Keywords are
    /// case-insensitive; literal terms are lower-cased.
    ///
    /// # Errors
    ///
    /// Returns `QueryError::EmptyExpression` if the query or a group is empty.
    ///
    /// Returns `QueryError::UnbalancedParenthesis` if parentheses do not pair up.
    ///
    /// Returns `QueryError::EmptyOperand` if an operator lacks an operand, and
    /// `QueryError::OperandCount` if `NOT` or `NEAR` has more than two.
    ///
    /// Returns `QueryError::MissingNearDistance` for `NEAR` without `/<n>`.
    ///
    /// Returns `QueryError::UnknownGroup` if an operand mixes a group with
    /// other text.
    ///
    /// Returns `QueryError::Pattern` if a term cannot be compiled.
    pub fn parse(input: &str) -> QueryResult<ConditionNode> {
        let mut query = normalize_query(input);
        if query.is_empty() {
            return Err(QueryError::EmptyExpression);
        }

        let mut parser = Self { groups: Vec::new() };

        while let Some(close) = query.find(')') {
            let open = query[..close]
                .rfind('(')
                .ok_or(QueryError::UnbalancedParenthesis { position: close })?;

            debug!(group = &query[open + 1..close], "parsing parenthesized group");
            let node = parser.parse_level(&query[open + 1..close])?;
            parser.groups.push(Some(node));

            let reference = format!(" :{}: ", parser.groups.len() - 1);
            query.replace_range(open..=close, &reference);
            debug!(query = %query, "query after group substitution");
        }

        if let Some(open) = query.find('(') {
            return Err(QueryError::UnbalancedParenthesis { position: open });
        }

        parser.parse_level(&query)
    }

    /// Parses a paren-free expression.
    fn parse_level(&mut self, expr: &str) -> QueryResult<ConditionNode> {
        let words: Vec<&str> = expr.split_whitespace().collect();
        if words.is_empty() {
            return Err(QueryError::EmptyExpression);
        }

        for kind in [OperatorKind::Or, OperatorKind::And, OperatorKind::Not] {
            let keyword = kind.keyword();
            if !words.iter().any(|w| w.eq_ignore_ascii_case(keyword)) {
                continue;
            }

            let operands = split_operands(&words, keyword, |w| w.eq_ignore_ascii_case(keyword))?;
            let mut nodes = operands
                .iter()
                .map(|op| self.parse_operand(op))
                .collect::<QueryResult<Vec<_>>>()?;

            return match kind {
                OperatorKind::Or => Ok(ConditionNode::Or(nodes)),
                OperatorKind::And => Ok(ConditionNode::And(nodes)),
                _ => {
                    if nodes.len() != 2 {
                        return Err(QueryError::operand_count(keyword, nodes.len()));
                    }
                    let exclude = nodes.pop().ok_or(QueryError::EmptyExpression)?;
                    let include = nodes.pop().ok_or(QueryError::EmptyExpression)?;
                    Ok(ConditionNode::not(include, exclude))
                }
            };
        }

        if let Some(first) = words.iter().copied().find(|w| is_near_keyword(w)) {
            let distance = near_distance(first)?;
            for word in words.iter().copied().filter(|w| is_near_keyword(w)) {
                near_distance(word)?;
            }

            let keyword = OperatorKind::Near.keyword();
            let operands = split_operands(&words, keyword, is_near_keyword)?;
            if operands.len() != 2 {
                return Err(QueryError::operand_count(keyword, operands.len()));
            }
            let left = self.parse_operand(&operands[0])?;
            let right = self.parse_operand(&operands[1])?;
            return Ok(ConditionNode::near(left, right, distance));
        }

        self.parse_operand(&words.join(" "))
    }

    /// Resolves one operand: a group reference or a literal term.
    fn parse_operand(&mut self, operand: &str) -> QueryResult<ConditionNode> {
        if let Some(index) = group_index(operand) {
            return self
                .groups
                .get_mut(index)
                .and_then(Option::take)
                .ok_or_else(|| QueryError::unknown_group(operand));
        }

        if operand.split(' ').any(|w| group_index(w).is_some()) {
            return Err(QueryError::unknown_group(operand));
        }

        let pattern = compile_word(&operand.to_lowercase())?;
        Ok(ConditionNode::Leaf(pattern))
    }
}

/// Splits words on separators, joining each run of words into one operand.
fn split_operands(
    words: &[&str],
    operator: &'static str,
    is_separator: impl Fn(&str) -> bool,
) -> QueryResult<Vec<String>> {
    let mut operands = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for word in words.iter().copied() {
        if is_separator(word) {
            if current.is_empty() {
                return Err(QueryError::EmptyOperand { operator });
            }
            operands.push(current.join(" "));
            current.clear();
        } else {
            current.push(word);
        }
    }

    if current.is_empty() {
        return Err(QueryError::EmptyOperand { operator });
    }
    operands.push(current.join(" "));
    Ok(operands)
}

/// Returns true for `NEAR` and any `NEAR/...` word, well-formed or not.
fn is_near_keyword(word: &str) -> bool {
    let Some(head) = word.get(..4) else {
        return false;
    };
    head.eq_ignore_ascii_case("near") && (word.len() == 4 || word[4..].starts_with('/'))
}

/// Extracts the distance from a `NEAR/<n>` word.
fn near_distance(word: &str) -> QueryResult<usize> {
    word.get(5..)
        .filter(|digits| !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()))
        .and_then(|digits| digits.parse().ok())
        .ok_or_else(|| QueryError::missing_near_distance(word))
}

/// Parses a `:<index>:` group reference.
fn group_index(word: &str) -> Option<usize> {
    let digits = word.strip_prefix(':')?.strip_suffix(':')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
