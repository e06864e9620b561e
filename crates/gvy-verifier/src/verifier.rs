//! Verifier state and the per-class driver.
//!
//! `Verifier` owns a mutable borrow of the arena for the duration of a pass.
//! The phases are implemented as `impl Verifier<'_>` blocks in sibling
//! modules:
//! - `default_params.rs` - overloads for parameters with default values
//! - `groovy_object.rs` - metaclass fields and `GroovyObject` methods
//! - `initializers.rs` - constructor and `<clinit>` assembly
//! - `properties.rs` - property accessors
//! - `covariant.rs` - bridge methods for covariant overrides
//! - `validators.rs`, `code_checks.rs`, `this_before_super.rs`,
//!   `final_vars.rs` - structural checks

use gvy_ast::{
    AstArena, ClassFlags, ClassId, MemberFlags, MethodId, MethodNode, ModuleId, names,
};
use gvy_common::limits::MAX_HIERARCHY_DEPTH;
use gvy_common::{Diagnostic, Span};
use rustc_hash::FxHashSet;

use crate::error::{ErrorNode, VerifyError, VerifyResult};
use crate::options::VerifierOptions;

/// Class verifier over one arena.
pub struct Verifier<'a> {
    pub(crate) arena: &'a mut AstArena,
    pub(crate) options: VerifierOptions,
    diagnostics: Vec<Diagnostic>,
}

/// Result of verifying a module.
#[derive(Debug, Default)]
pub struct VerifyOutcome {
    /// Classes that completed, in verification order.
    pub verified: Vec<ClassId>,
    pub failed: Vec<(ClassId, VerifyError)>,
}

impl<'a> Verifier<'a> {
    pub fn new(arena: &'a mut AstArena, options: VerifierOptions) -> Self {
        Verifier {
            arena,
            options,
            diagnostics: Vec::new(),
        }
    }

    #[must_use]
    pub fn arena(&self) -> &AstArena {
        self.arena
    }

    #[must_use]
    pub fn options(&self) -> VerifierOptions {
        self.options
    }

    /// Warnings and errors collected so far.
    #[must_use]
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    #[must_use]
    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl Verifier<'_> {
    // =========================================================================
    // Drivers
    // =========================================================================

    /// Verify every class of `module`, supertypes declared in the same module
    /// first. Errors are recorded as diagnostics.
    pub fn verify_module(&mut self, module: ModuleId) -> VerifyOutcome {
        let order = self.module_order(module);
        tracing::debug!(
            module = %self.arena.module(module).name,
            classes = order.len(),
            "verify_module"
        );

        let mut outcome = VerifyOutcome::default();
        for class in order {
            match self.visit_class(class) {
                Ok(()) => outcome.verified.push(class),
                Err(err) => {
                    tracing::debug!(class = %self.arena.class(class).name, error = %err, "class failed");
                    let file = self.file_name(class);
                    self.diagnostics.push(err.to_diagnostic(&file));
                    outcome.failed.push((class, err));
                    if !self.options.continue_after_error {
                        break;
                    }
                }
            }
        }
        outcome
    }

    fn module_order(&self, module: ModuleId) -> Vec<ClassId> {
        let members = self.arena.module(module).classes.clone();
        let mut visited = FxHashSet::default();
        let mut order = Vec::with_capacity(members.len());
        for &class in &members {
            self.push_supertypes_first(class, &members, &mut visited, &mut order, 0);
        }
        order
    }

    fn push_supertypes_first(
        &self,
        class: ClassId,
        members: &[ClassId],
        visited: &mut FxHashSet<ClassId>,
        order: &mut Vec<ClassId>,
        depth: usize,
    ) {
        if depth > MAX_HIERARCHY_DEPTH || !visited.insert(class) {
            return;
        }
        let node = self.arena.class(class);
        let supertypes: Vec<ClassId> = node
            .super_class
            .iter()
            .chain(&node.interfaces)
            .filter_map(|ty| self.arena.class_of_type(ty))
            .filter(|c| members.contains(c))
            .collect();
        for supertype in supertypes {
            self.push_supertypes_first(supertype, members, visited, order, depth + 1);
        }
        order.push(class);
    }

    /// Prepare one class for class generation.
    ///
    /// The phase order matters: overloads exist before the metaclass members
    /// are looked up, constructors exist before initializers are merged into
    /// them, and bridges are computed over the final method set.
    #[tracing::instrument(level = "debug", skip(self), fields(class = %self.arena.class(class).name))]
    pub fn visit_class(&mut self, class: ClassId) -> VerifyResult<()> {
        if self.arena.class(class).flags.contains(ClassFlags::VERIFIED) {
            tracing::debug!("already verified");
            return Ok(());
        }

        let node = self.arena.class(class);
        if node.is_interface() || node.is_trait() {
            self.add_interface_initialization(class)?;
            self.visit_contents(class)?;
            self.arena.class_mut(class).flags |= ClassFlags::SKIP_FAST_PATH | ClassFlags::VERIFIED;
            return Ok(());
        }

        self.check_duplicate_interfaces(class)?;
        self.add_default_parameter_methods(class)?;
        self.add_default_parameter_constructors(class)?;

        self.add_static_meta_class_field(class);
        let known_special_case = self.is_known_special_case(class);
        self.add_fast_path_helper_field(class)?;
        if !known_special_case {
            self.add_groovy_object_interface_and_methods(class)?;
        }

        self.add_default_constructor(class);
        self.add_initialization(class)?;
        self.check_return_in_object_initializer(class)?;
        self.arena.class_mut(class).object_initializers.clear();

        self.visit_contents(class)?;
        self.check_for_duplicate_methods(class)?;
        self.add_covariant_methods(class)?;
        self.check_final_variables(class)?;

        self.arena.class_mut(class).flags |= ClassFlags::VERIFIED;
        Ok(())
    }

    /// `GString` and `GroovyObjectSupport` subclasses already carry the
    /// metaclass plumbing.
    fn is_known_special_case(&self, class: ClassId) -> bool {
        let ty = self.arena.class(class).as_type();
        [names::GSTRING, names::GROOVY_OBJECT_SUPPORT]
            .iter()
            .any(|&name| self.arena.is_derived_from(&ty, &gvy_ast::TypeRef::class(name)))
    }

    // =========================================================================
    // Contents
    // =========================================================================

    fn visit_contents(&mut self, class: ClassId) -> VerifyResult<()> {
        let properties = self.arena.class(class).properties.clone();
        let mut accessors = FxHashSet::default();
        for property in properties {
            accessors.extend(self.visit_property(class, property)?);
        }

        let constructors = self.arena.class(class).constructors.clone();
        for constructor in constructors {
            self.visit_constructor(class, constructor)?;
        }

        let methods = self.arena.class(class).methods.clone();
        for method in methods {
            if !accessors.contains(&method) {
                self.visit_method(class, method)?;
            }
        }
        Ok(())
    }

    pub(crate) fn visit_method(&mut self, class: ClassId, method: MethodId) -> VerifyResult<()> {
        self.check_mop_method(class, method)?;
        self.adjust_types_if_static_main_method(method);
        self.add_return_if_needed(method);
        self.check_method_code(class, method)
    }

    fn visit_constructor(&mut self, class: ClassId, constructor: MethodId) -> VerifyResult<()> {
        if self.arena.method(constructor).code.is_none() {
            return Ok(());
        }
        self.check_method_code(class, constructor)?;
        self.check_this_before_super(class, constructor)
    }

    // =========================================================================
    // Shared helpers
    // =========================================================================

    /// Add a generated method and let it implement any matching abstract
    /// method declared in the same class.
    pub(crate) fn add_property_method(&mut self, node: MethodNode) -> MethodId {
        let class = node.declaring_class;
        let method = self.arena.add_method(node);
        self.mark_as_generated(method);

        let added = self.arena.method(method);
        let name = added.name.clone();
        let parameter_types = self.arena.parameter_types(method);
        let return_type = added.return_type.clone();
        let code = added.code.clone();

        let adopted: Vec<MethodId> = self
            .arena
            .class(class)
            .methods
            .iter()
            .copied()
            .filter(|&m| m != method)
            .filter(|&m| {
                let candidate = self.arena.method(m);
                if !candidate.is_abstract()
                    || candidate.name != name
                    || candidate.parameters.len() != parameter_types.len()
                {
                    return false;
                }
                if parameter_types.len() == 1 {
                    let expected = &self.arena.param(candidate.parameters[0]).ty;
                    if !self.is_subtype_or_implementor(&parameter_types[0], expected) {
                        return false;
                    }
                }
                self.is_subtype_or_implementor(&return_type, &candidate.return_type)
            })
            .collect();

        for abstract_method in adopted {
            tracing::trace!(method = %name, "generated method implements abstract declaration");
            let target = self.arena.method_mut(abstract_method);
            target.modifiers.remove(gvy_ast::Modifiers::ABSTRACT);
            target.code = code.clone();
        }
        method
    }

    fn is_subtype_or_implementor(&self, ty: &gvy_ast::TypeRef, target: &gvy_ast::TypeRef) -> bool {
        self.arena.is_derived_from(ty, target) || self.arena.implements_interface(ty, target)
    }

    pub(crate) fn mark_as_generated(&mut self, method: MethodId) {
        if self.options.annotate_generated {
            self.arena.method_mut(method).flags |= MemberFlags::GENERATED;
        }
    }

    /// Node and span to report a method error against. Generated members
    /// without a position fall back to the property they were derived from,
    /// then to the class.
    pub(crate) fn source_of(&self, method: MethodId) -> (ErrorNode, Span) {
        let node = self.arena.method(method);
        if node.span.has_position() {
            return (ErrorNode::Method(method), node.span);
        }
        let class = node.declaring_class;
        if node.is_synthetic() {
            if let Some(property_name) = property_name_of_accessor(node) {
                if let Some(property) = self.arena.declared_property(class, &property_name) {
                    let span = self.arena.property(property).span;
                    if span.has_position() {
                        return (ErrorNode::Property(property), span);
                    }
                }
            }
        }
        (ErrorNode::Class(class), self.arena.class(class).span)
    }

    pub(crate) fn method_error(&self, method: MethodId, code: u32, args: &[&str]) -> VerifyError {
        let (node, span) = self.source_of(method);
        VerifyError::parser(code, args, node, span)
    }

    pub(crate) fn class_error(&self, class: ClassId, code: u32, args: &[&str]) -> VerifyError {
        VerifyError::parser(code, args, ErrorNode::Class(class), self.arena.class(class).span)
    }

    pub(crate) fn warn(&mut self, class: ClassId, code: u32, args: &[&str], span: Span) {
        let diagnostic = Diagnostic::from_code(self.file_name(class), span, code, args);
        tracing::debug!(code, message = %diagnostic.message_text, "warning");
        self.diagnostics.push(diagnostic);
    }

    pub(crate) fn file_name(&self, class: ClassId) -> String {
        self.arena
            .class(class)
            .module
            .map(|m| self.arena.module(m).name.clone())
            .unwrap_or_else(|| self.arena.class(class).name.clone())
    }
}

// =============================================================================
// Bean naming
// =============================================================================

/// `name` -> `Name`, leaving `pName` style names untouched.
pub(crate) fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    if first.is_lowercase() && rest.chars().next().is_some_and(char::is_uppercase) {
        return name.to_string();
    }
    first.to_uppercase().chain(rest.chars()).collect()
}

/// `Name` -> `name`, leaving `URL` style names untouched.
pub(crate) fn decapitalize(name: &str) -> String {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str();
    if first.is_uppercase() && rest.chars().next().is_some_and(char::is_uppercase) {
        return name.to_string();
    }
    first.to_lowercase().chain(rest.chars()).collect()
}

/// Property a getter or setter stands for, if its shape is a bean accessor.
pub(crate) fn property_name_of_accessor(method: &MethodNode) -> Option<String> {
    let name = method.name.as_str();
    let (prefix_len, is_setter) = if name.starts_with("set") {
        (3, true)
    } else if name.starts_with("get") {
        (3, false)
    } else if name.starts_with("is") {
        (2, false)
    } else {
        return None;
    };
    let property = decapitalize(&name[prefix_len..]);
    if property.is_empty() {
        return None;
    }
    if is_setter {
        return (method.parameters.len() == 1).then_some(property);
    }
    let boolean_getter = method.return_type.as_primitive() == Some(gvy_ast::PrimitiveType::Boolean);
    (method.parameters.is_empty()
        && !method.is_void()
        && (name.starts_with("get") || boolean_getter))
        .then_some(property)
}
