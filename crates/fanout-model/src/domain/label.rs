use std::fmt;

use crate::domain::target::Target;

/// ANSI color palette cycled over targets by their position in the set.
pub const PALETTE: [&str; 8] = [
    "\x1b[32m", // green
    "\x1b[33m", // yellow
    "\x1b[34m", // blue
    "\x1b[35m", // magenta
    "\x1b[36m", // cyan
    "\x1b[90m", // gray
    "\x1b[92m", // bright green
    "\x1b[94m", // bright blue
];

/// ANSI reset sequence.
pub const RESET: &str = "\x1b[0m";

/// Stable display label for one target.
///
/// The color is a pure function of the target's position in its
/// [`TargetSet`](crate::TargetSet), so interleaved concurrent output stays
/// attributable and repeatable. Labels never affect scheduling or outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLabel {
    target: Target,
    color: &'static str,
}

impl TargetLabel {
    /// Build a label for a target sitting at `index` in its set.
    ///
    /// The palette is cycled when the set is larger than the palette.
    pub fn new(target: Target, index: usize) -> Self {
        Self {
            target,
            color: PALETTE[index % PALETTE.len()],
        }
    }

    /// Label for a target outside any set; uses the first palette color.
    pub fn detached(target: Target) -> Self {
        Self::new(target, 0)
    }

    /// The labeled target.
    pub fn target(&self) -> &Target {
        &self.target
    }

    /// ANSI color escape assigned to this target.
    pub fn color(&self) -> &'static str {
        self.color
    }

    /// Bracketed prefix, e.g. `[base_sepolia]`.
    pub fn prefix(&self) -> String {
        format!("[{}]", self.target)
    }

    /// Render one output line with the label prefix.
    ///
    /// With color enabled the whole line is wrapped in the target's color.
    pub fn paint(&self, line: &str, use_color: bool) -> String {
        if use_color {
            format!("{}[{}] {}{}", self.color, self.target, line, RESET)
        } else {
            format!("[{}] {}", self.target, line)
        }
    }
}

impl fmt::Display for TargetLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.target)
    }
}

#[cfg(test)]
mod tests {
    use super::{PALETTE, RESET, TargetLabel};
    use crate::{Target, TargetSet};

    #[test]
    fn palette_cycles_for_large_sets() {
        let targets: Vec<Target> = (0..20).map(|i| Target::new(format!("net-{i}"))).collect();
        let set = TargetSet::new(targets.clone());

        let first = set.label_of(&targets[0]).unwrap();
        let wrapped = set.label_of(&targets[PALETTE.len()]).unwrap();
        assert_eq!(first.color(), wrapped.color());

        let second = set.label_of(&targets[1]).unwrap();
        assert_ne!(first.color(), second.color());
    }

    #[test]
    fn paint_wraps_line_in_color_and_reset() {
        let label = TargetLabel::new(Target::new("base"), 0);

        let colored = label.paint("hello", true);
        assert!(colored.starts_with(PALETTE[0]));
        assert!(colored.ends_with(RESET));
        assert!(colored.contains("[base] hello"));
    }

    #[test]
    fn paint_without_color_is_plain_prefix() {
        let label = TargetLabel::new(Target::new("base"), 3);
        assert_eq!(label.paint("hello", false), "[base] hello");
    }

    #[test]
    fn same_set_same_assignment() {
        let set_a = TargetSet::new(["alpha", "beta", "gamma"].map(Target::from));
        let set_b = TargetSet::new(["alpha", "beta", "gamma"].map(Target::from));
        let t = Target::new("gamma");

        assert_eq!(set_a.label_of(&t), set_b.label_of(&t));
    }
}
