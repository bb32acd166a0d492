//! Scope-satisfaction algebra: deciding whether a set of owned scope patterns satisfies a
//! disjunctive-normal-form requirement, and intersecting two owned scope sets for narrowing.
//!
//! A scope pattern is a non-empty string; a trailing `*` (and only there) makes it a prefix
//! wildcard, matching any literal sharing that prefix. Everywhere else `*` is a literal
//! character. The matching and combination rules below are expressed as direct, short-circuiting
//! loops rather than generic `any`/`all` combinators, so the quantifier structure of the
//! satisfaction rule stays visible at the call site.

/// A disjunctive-normal-form scope requirement: the outer list is disjunctive (any clause
/// suffices), each inner list is conjunctive (every literal in it is required).
pub type Requirement = [Vec<String>];

/// Returns true iff `covering` grants `candidate` under the prefix-wildcard matching rule.
///
/// `covering` grants `candidate` if they are exactly equal, or if `covering` ends in `*` and
/// `candidate` starts with the prefix preceding that `*`.
pub fn covers(covering: &str, candidate: &str) -> bool {
	if covering == candidate {
		return true;
	}

	match covering.strip_suffix('*') {
		Some(prefix) => candidate.starts_with(prefix),
		None => false,
	}
}

/// Returns true iff some pattern in `owned` covers `literal`.
fn owned_covers(owned: &[impl AsRef<str>], literal: &str) -> bool {
	for pattern in owned {
		if covers(pattern.as_ref(), literal) {
			return true;
		}
	}

	false
}

/// Decides whether `owned` satisfies `required`.
///
/// `required` is satisfied iff at least one of its clauses (the outer, disjunctive sequence) is
/// satisfied; a clause is satisfied iff every literal in it (the inner, conjunctive sequence) is
/// covered by some pattern in `owned`. An empty clause is vacuously satisfied; an empty
/// requirement is never satisfied. Both quantifiers short-circuit.
pub fn satisfies(owned: &[impl AsRef<str>], required: &Requirement) -> bool {
	for clause in required {
		let mut clause_satisfied = true;

		for literal in clause {
			if !owned_covers(owned, literal) {
				clause_satisfied = false;

				break;
			}
		}

		if clause_satisfied {
			return true;
		}
	}

	false
}

/// Returns the scope set that a client owning both `a` and `b` would effectively hold: every
/// pattern from either side that is covered by some pattern on the other side, stably deduplicated.
///
/// This is the basis of authorized-scope narrowing (§4.C5): narrowing never widens because the
/// result can only retain patterns that both sides already agree on.
pub fn intersect(a: &[impl AsRef<str>], b: &[impl AsRef<str>]) -> Vec<String> {
	let mut result = Vec::new();

	for x in a {
		let x = x.as_ref();

		if owned_covers(b, x) && !result.iter().any(|kept: &String| kept == x) {
			result.push(x.to_string());
		}
	}

	for y in b {
		let y = y.as_ref();

		if owned_covers(a, y) && !result.iter().any(|kept: &String| kept == y) {
			result.push(y.to_string());
		}
	}

	result
}
