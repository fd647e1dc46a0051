use xg_tree::{XNode, vocab};

// -----------------------------------------------------------------------------
// Version suffix

/// Strip a trailing `@<digits[.digits]*>` version suffix from a type
/// name. Legacy documents may version-qualify stored names; the
/// registry only knows the unqualified form.
///
/// ```
/// use xg_serial::strip_version_suffix;
///
/// assert_eq!(strip_version_suffix("demo::Shape@1.2"), "demo::Shape");
/// assert_eq!(strip_version_suffix("demo::Shape"), "demo::Shape");
/// assert_eq!(strip_version_suffix("user@host"), "user@host");
/// ```
pub fn strip_version_suffix(name: &str) -> &str {
    match name.rsplit_once('@') {
        Some((base, suffix))
            if !base.is_empty()
                && !suffix.is_empty()
                && suffix.chars().all(|c| c.is_ascii_digit() || c == '.') =>
        {
            base
        }
        _ => name,
    }
}

// -----------------------------------------------------------------------------
// TypeDescriptor

/// The serializable representation of a runtime type: a base name and
/// nested generic-argument descriptors, sufficient to re-resolve the
/// type against a registry.
///
/// In the document each referenced type becomes one type-container
/// entry tagged [`X_TYPE`](vocab::X_TYPE) carrying the `ref` id and
/// `name` attributes; generic types nest an
/// [`XGenericDefinition`](vocab::X_GENERIC_DEFINITION) child with one
/// entry per argument.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeDescriptor {
    name: String,
    generics: Vec<TypeDescriptor>,
}

impl TypeDescriptor {
    /// Create a descriptor for a non-generic type name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            generics: Vec::new(),
        }
    }

    /// Parse a full type path, splitting trailing generic arguments.
    ///
    /// ```
    /// use xg_serial::TypeDescriptor;
    ///
    /// let d = TypeDescriptor::parse("Map<String, List<i32>>");
    /// assert_eq!(d.name(), "Map");
    /// assert_eq!(d.generics().len(), 2);
    /// assert_eq!(d.generics()[1].name(), "List");
    /// ```
    pub fn parse(path: &str) -> Self {
        let path = path.trim();
        let Some(open) = path.find('<') else {
            return Self::new(path);
        };
        if !path.ends_with('>') {
            return Self::new(path);
        }

        let name = path[..open].trim().to_owned();
        let inner = &path[open + 1..path.len() - 1];

        let mut generics = Vec::new();
        let mut depth = 0_i32;
        let mut start = 0;
        for (i, c) in inner.char_indices() {
            match c {
                '<' => depth += 1,
                '>' => depth -= 1,
                ',' if depth == 0 => {
                    generics.push(Self::parse(&inner[start..i]));
                    start = i + 1;
                }
                _ => {}
            }
        }
        if !inner[start..].trim().is_empty() {
            generics.push(Self::parse(&inner[start..]));
        }

        Self { name, generics }
    }

    /// Returns the base name, version suffix included if stored.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the generic argument descriptors.
    #[inline]
    pub fn generics(&self) -> &[TypeDescriptor] {
        &self.generics
    }

    /// Reassemble the full path, generic arguments included.
    pub fn full_path(&self) -> String {
        if self.generics.is_empty() {
            return self.name.clone();
        }
        let args: Vec<String> = self.generics.iter().map(TypeDescriptor::full_path).collect();
        format!("{}<{}>", self.name, args.join(", "))
    }

    /// Encode as a type-container entry carrying the given `type_N`
    /// reference id.
    pub fn to_node(&self, ref_id: &str) -> XNode {
        let mut node = self.to_bare_node();
        node.set_attribute(vocab::ATTR_REF, ref_id);
        node
    }

    fn to_bare_node(&self) -> XNode {
        let mut node = XNode::new(vocab::X_TYPE);
        node.set_attribute(vocab::ATTR_NAME, &self.name);
        if !self.generics.is_empty() {
            let mut definition = XNode::new(vocab::X_GENERIC_DEFINITION);
            for argument in &self.generics {
                definition.add_child(argument.to_bare_node());
            }
            node.add_child(definition);
        }
        node
    }

    /// Decode a type-container entry. `None` when the `name`
    /// attribute is missing.
    pub fn from_node(node: &XNode) -> Option<Self> {
        let name = node.attribute(vocab::ATTR_NAME)?.to_owned();
        let mut generics = Vec::new();
        if let Some(definition) = node.child(vocab::X_GENERIC_DEFINITION) {
            for child in definition.children() {
                generics.push(Self::from_node(child)?);
            }
        }
        Some(Self { name, generics })
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use xg_tree::vocab;

    use super::{TypeDescriptor, strip_version_suffix};

    #[test]
    fn parse_plain_name() {
        let d = TypeDescriptor::parse("demo::Shape");
        assert_eq!(d.name(), "demo::Shape");
        assert!(d.generics().is_empty());
        assert_eq!(d.full_path(), "demo::Shape");
    }

    #[test]
    fn parse_nested_generics() {
        let d = TypeDescriptor::parse("Map<String, List<Pair<i32, f64>>>");
        assert_eq!(d.name(), "Map");
        assert_eq!(d.generics()[0].name(), "String");
        let list = &d.generics()[1];
        assert_eq!(list.name(), "List");
        assert_eq!(list.generics()[0].generics().len(), 2);
        assert_eq!(d.full_path(), "Map<String, List<Pair<i32, f64>>>");
    }

    #[test]
    fn node_round_trip() {
        let d = TypeDescriptor::parse("List<demo::Shape>");
        let node = d.to_node("type_3");

        assert_eq!(node.tag(), vocab::X_TYPE);
        assert_eq!(node.attribute(vocab::ATTR_REF), Some("type_3"));
        assert_eq!(node.attribute(vocab::ATTR_NAME), Some("List"));
        assert!(node.child(vocab::X_GENERIC_DEFINITION).is_some());

        assert_eq!(TypeDescriptor::from_node(&node).unwrap(), d);
    }

    #[test]
    fn version_suffix_rules() {
        assert_eq!(strip_version_suffix("A@1"), "A");
        assert_eq!(strip_version_suffix("A@1.0.3"), "A");
        assert_eq!(strip_version_suffix("A@"), "A@");
        assert_eq!(strip_version_suffix("@1"), "@1");
        assert_eq!(strip_version_suffix("A@beta"), "A@beta");
    }
}
