//! The binding plan: a function signature's classification, frozen at
//! registration.

/// Pass-through slot kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassThrough {
    /// The in-flight request object.
    Request,
    /// The response destination handle.
    Writer,
}

/// Binding sources a data-bound argument is eligible for.
///
/// Form and JSON eligibility may coexist on the same argument; which one
/// applies to a given request is decided by its content type, never by the
/// plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueBinding {
    pub(crate) form: bool,
    pub(crate) query: bool,
    pub(crate) json: bool,
    /// Path keys resolved at plan time, so per-request lookup only ever
    /// fetches known keys.
    pub(crate) path_keys: Option<&'static [&'static str]>,
}

/// Classification of a single argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgBinding {
    /// Pass-through request slot.
    Request,
    /// Pass-through response-destination slot.
    Writer,
    /// Data-bound (or inert) argument.
    Value(ValueBinding),
}

/// Immutable binding plan for one registered function.
///
/// Built exactly once at registration and shared read-only across every
/// subsequent request; argument entries are dense, zero-based, and in
/// declared parameter order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindPlan {
    args: Vec<ArgBinding>,
    has_payload: bool,
}

impl BindPlan {
    pub(crate) fn new(args: Vec<ArgBinding>, has_payload: bool) -> Self {
        Self { args, has_payload }
    }

    /// Per-argument classifications, in declared order.
    #[must_use]
    pub fn args(&self) -> &[ArgBinding] {
        &self.args
    }

    /// Whether the return value can produce a response body.
    #[must_use]
    pub fn has_payload(&self) -> bool {
        self.has_payload
    }

    /// Indices of arguments supplied directly by the request machinery.
    #[must_use]
    pub fn pass_through(&self) -> Vec<(usize, PassThrough)> {
        self.args
            .iter()
            .enumerate()
            .filter_map(|(idx, arg)| match arg {
                ArgBinding::Request => Some((idx, PassThrough::Request)),
                ArgBinding::Writer => Some((idx, PassThrough::Writer)),
                ArgBinding::Value(_) => None,
            })
            .collect()
    }

    /// Indices eligible for form-body population.
    #[must_use]
    pub fn form_targets(&self) -> Vec<usize> {
        self.value_targets(|v| v.form)
    }

    /// Indices eligible for whole-body JSON population.
    #[must_use]
    pub fn json_targets(&self) -> Vec<usize> {
        self.value_targets(|v| v.json)
    }

    /// Indices eligible for query-string population.
    #[must_use]
    pub fn query_targets(&self) -> Vec<usize> {
        self.value_targets(|v| v.query)
    }

    /// Indices eligible for path population, with their resolved keys.
    #[must_use]
    pub fn path_targets(&self) -> Vec<(usize, &'static [&'static str])> {
        self.args
            .iter()
            .enumerate()
            .filter_map(|(idx, arg)| match arg {
                ArgBinding::Value(v) => v.path_keys.map(|keys| (idx, keys)),
                _ => None,
            })
            .collect()
    }

    fn value_targets(&self, pick: impl Fn(&ValueBinding) -> bool) -> Vec<usize> {
        self.args
            .iter()
            .enumerate()
            .filter_map(|(idx, arg)| match arg {
                ArgBinding::Value(v) if pick(v) => Some(idx),
                _ => None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_plan() -> BindPlan {
        BindPlan::new(
            vec![
                ArgBinding::Writer,
                ArgBinding::Request,
                ArgBinding::Value(ValueBinding {
                    form: true,
                    query: false,
                    json: true,
                    path_keys: Some(&["Name", "Age"]),
                }),
                ArgBinding::Value(ValueBinding::default()),
            ],
            true,
        )
    }

    #[test]
    fn test_pass_through_slots() {
        let plan = sample_plan();
        assert_eq!(
            plan.pass_through(),
            vec![(0, PassThrough::Writer), (1, PassThrough::Request)]
        );
    }

    #[test]
    fn test_target_sets() {
        let plan = sample_plan();
        assert_eq!(plan.form_targets(), vec![2]);
        assert_eq!(plan.json_targets(), vec![2]);
        assert!(plan.query_targets().is_empty());
        let path = plan.path_targets();
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].0, 2);
        assert_eq!(path[0].1, &["Name", "Age"]);
    }

    #[test]
    fn test_inert_argument_has_no_targets() {
        let plan = BindPlan::new(vec![ArgBinding::Value(ValueBinding::default())], false);
        assert!(plan.form_targets().is_empty());
        assert!(plan.json_targets().is_empty());
        assert!(plan.query_targets().is_empty());
        assert!(plan.path_targets().is_empty());
        assert!(!plan.has_payload());
    }

    #[test]
    fn test_plans_compare_equal() {
        assert_eq!(sample_plan(), sample_plan());
    }
}
