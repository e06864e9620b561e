use super::{DiagnosticCategory, DiagnosticMessage};

pub mod diagnostic_codes {
    pub const DUPLICATE_INTERFACES_IN_IMPLEMENTS_LIST: u32 = 1001;
    pub const INTERFACE_IMPLEMENTED_WITH_DIFFERENT_ARGUMENTS: u32 = 1002;

    pub const DEFAULT_PARAMETER_METHOD_ALREADY_DEFINED: u32 = 1101;
    pub const DEFAULT_PARAMETER_NOT_TRAILING: u32 = 1102;
    pub const GENERATED_CONSTRUCTOR_REFERENCES_REPLACED_PARAMETER: u32 = 1103;

    pub const FIELD_RESERVED_FOR_INTERNAL_USE: u32 = 1201;
    pub const META_CLASS_FIELD_HAS_WRONG_TYPE: u32 = 1202;

    pub const RETURN_NOT_ALLOWED_IN_OBJECT_INITIALIZER: u32 = 1301;
    pub const CANNOT_REFERENCE_BEFORE_SUPERTYPE_CONSTRUCTOR: u32 = 1302;

    pub const METHOD_DUPLICATES_ANOTHER_METHOD: u32 = 1401;
    pub const METHOD_DUPLICATES_SCRIPT_BODY: u32 = 1402;
    pub const CONSTRUCTOR_DUPLICATES_ANOTHER_CONSTRUCTOR: u32 = 1403;
    pub const UNEXPECTED_MOP_METHOD: u32 = 1404;
    pub const FIRST_DECLARED_HERE: u32 = 1405;

    pub const METHOD_SHOULD_BE_PUBLIC: u32 = 1501;
    pub const INCOMPATIBLE_RETURN_TYPE: u32 = 1502;
    pub const CANNOT_OVERRIDE_FINAL_METHOD: u32 = 1503;
    pub const DISPARATE_STATIC_MODIFIER: u32 = 1504;
    pub const DIFFERENT_PRIMITIVE_RETURN_TYPES: u32 = 1505;
    pub const NEW_METHOD_HAS_PRIMITIVE_RETURN_TYPE: u32 = 1506;
    pub const OLD_METHOD_HAS_PRIMITIVE_RETURN_TYPE: u32 = 1507;

    pub const FINAL_VARIABLE_REASSIGNED: u32 = 1601;
    pub const FINAL_VARIABLE_MAY_BE_UNINITIALIZED: u32 = 1602;

    pub const IDENTIFIER_MUST_NOT_BE_EMPTY: u32 = 1701;
    pub const IDENTIFIER_MUST_INCLUDE_A_LETTER: u32 = 1702;
    pub const IDENTIFIER_MUST_START_WITH_A_LETTER: u32 = 1703;
    pub const IDENTIFIER_IS_NOT_VALID: u32 = 1704;
    pub const MAP_ENTRY_NOT_ALLOWED: u32 = 1705;
    pub const ENUM_CONSTRUCTOR_CALL_OUTSIDE_ENUM: u32 = 1706;

    pub const INTERNAL_COMPILER_ERROR: u32 = 9001;
}

pub mod diagnostic_messages {
    pub const DUPLICATE_INTERFACES_IN_IMPLEMENTS_LIST: &str =
        "Duplicate interfaces in implements list: [{0}]";
    pub const INTERFACE_IMPLEMENTED_WITH_DIFFERENT_ARGUMENTS: &str =
        "The interface {0} cannot be implemented more than once with different arguments: {1} and {2}";

    pub const DEFAULT_PARAMETER_METHOD_ALREADY_DEFINED: &str = "The method with default parameters \"{0}\" defines a method \"{1}\" that is already defined.";
    pub const DEFAULT_PARAMETER_NOT_TRAILING: &str = "The parameter '{0}' of \"{1}\" has no default value but follows a parameter with a default value.";
    pub const GENERATED_CONSTRUCTOR_REFERENCES_REPLACED_PARAMETER: &str = "The generated constructor \"{0}({1})\" references parameter '{2}' which has been replaced by a default value expression.";

    pub const FIELD_RESERVED_FOR_INTERNAL_USE: &str = "The class {0} cannot declare field '{1}' as this field is needed for internal groovy purposes";
    pub const META_CLASS_FIELD_HAS_WRONG_TYPE: &str = "The class {0} cannot declare field 'metaClass' of type {1} as it needs to be of the type groovy.lang.MetaClass for internal groovy purposes";

    pub const RETURN_NOT_ALLOWED_IN_OBJECT_INITIALIZER: &str =
        "'return' is not allowed in object initializer";
    pub const CANNOT_REFERENCE_BEFORE_SUPERTYPE_CONSTRUCTOR: &str = "Cannot reference '{0}' before supertype constructor has been called. Possible causes:\nYou attempted to access an instance field, method, or property.\nYou attempted to construct a non-static inner class.";

    pub const METHOD_DUPLICATES_ANOTHER_METHOD: &str =
        "The method {0} duplicates another method of the same signature";
    pub const METHOD_DUPLICATES_SCRIPT_BODY: &str =
        "The method {0} is a duplicate of the one declared for this script's body code";
    pub const CONSTRUCTOR_DUPLICATES_ANOTHER_CONSTRUCTOR: &str =
        "The constructor {0} duplicates another constructor of the same signature";
    pub const UNEXPECTED_MOP_METHOD: &str = "Found unexpected MOP methods in the class node for {0}({1})";
    pub const FIRST_DECLARED_HERE: &str = "{0} is first declared here";

    pub const METHOD_SHOULD_BE_PUBLIC: &str = "The method {0} should be public as it implements the corresponding method from interface {1}";
    pub const INCOMPATIBLE_RETURN_TYPE: &str =
        "The return type of {0} in {1} is incompatible with {2} in {3}";
    pub const CANNOT_OVERRIDE_FINAL_METHOD: &str = "Cannot override final method {0} in {1}";
    pub const DISPARATE_STATIC_MODIFIER: &str =
        "Cannot override method {0} in {1} with disparate static modifier";
    pub const DIFFERENT_PRIMITIVE_RETURN_TYPES: &str = "Cannot override method {0} in {1} with old and new method having different primitive return types";
    pub const NEW_METHOD_HAS_PRIMITIVE_RETURN_TYPE: &str = "Cannot override method {0} in {1} with new method having a primitive return type and old method not";
    pub const OLD_METHOD_HAS_PRIMITIVE_RETURN_TYPE: &str = "Cannot override method {0} in {1} with old method having a primitive return type and new method not";

    pub const FINAL_VARIABLE_REASSIGNED: &str = "The {0} [{1}] is declared final but is reassigned";
    pub const FINAL_VARIABLE_MAY_BE_UNINITIALIZED: &str = "The variable [{0}] may be uninitialized";

    pub const IDENTIFIER_MUST_NOT_BE_EMPTY: &str = "Invalid {0}. Identifier must not be empty";
    pub const IDENTIFIER_MUST_INCLUDE_A_LETTER: &str =
        "Invalid {0}. Must include a letter but only found: {1}";
    pub const IDENTIFIER_MUST_START_WITH_A_LETTER: &str =
        "Invalid {0}. Must start with a letter but was: {1}";
    pub const IDENTIFIER_IS_NOT_VALID: &str = "Invalid {0}. Must be a valid identifier but was: {1}";
    pub const MAP_ENTRY_NOT_ALLOWED: &str = "No map entry allowed at this place";
    pub const ENUM_CONSTRUCTOR_CALL_OUTSIDE_ENUM: &str =
        "Enum constructor calls are only allowed inside the enum class";

    pub const INTERNAL_COMPILER_ERROR: &str = "BUG! {0}";
}

macro_rules! messages {
    ($($category:ident $name:ident),* $(,)?) => {
        &[$(DiagnosticMessage {
            code: diagnostic_codes::$name,
            category: DiagnosticCategory::$category,
            message: diagnostic_messages::$name,
        }),*]
    };
}

pub static DIAGNOSTIC_MESSAGES: &[DiagnosticMessage] = messages![
    Error DUPLICATE_INTERFACES_IN_IMPLEMENTS_LIST,
    Warning INTERFACE_IMPLEMENTED_WITH_DIFFERENT_ARGUMENTS,
    Error DEFAULT_PARAMETER_METHOD_ALREADY_DEFINED,
    Error DEFAULT_PARAMETER_NOT_TRAILING,
    Error GENERATED_CONSTRUCTOR_REFERENCES_REPLACED_PARAMETER,
    Error FIELD_RESERVED_FOR_INTERNAL_USE,
    Error META_CLASS_FIELD_HAS_WRONG_TYPE,
    Error RETURN_NOT_ALLOWED_IN_OBJECT_INITIALIZER,
    Error CANNOT_REFERENCE_BEFORE_SUPERTYPE_CONSTRUCTOR,
    Error METHOD_DUPLICATES_ANOTHER_METHOD,
    Error METHOD_DUPLICATES_SCRIPT_BODY,
    Error CONSTRUCTOR_DUPLICATES_ANOTHER_CONSTRUCTOR,
    Error UNEXPECTED_MOP_METHOD,
    Message FIRST_DECLARED_HERE,
    Error METHOD_SHOULD_BE_PUBLIC,
    Error INCOMPATIBLE_RETURN_TYPE,
    Error CANNOT_OVERRIDE_FINAL_METHOD,
    Error DISPARATE_STATIC_MODIFIER,
    Error DIFFERENT_PRIMITIVE_RETURN_TYPES,
    Error NEW_METHOD_HAS_PRIMITIVE_RETURN_TYPE,
    Error OLD_METHOD_HAS_PRIMITIVE_RETURN_TYPE,
    Error FINAL_VARIABLE_REASSIGNED,
    Error FINAL_VARIABLE_MAY_BE_UNINITIALIZED,
    Error IDENTIFIER_MUST_NOT_BE_EMPTY,
    Error IDENTIFIER_MUST_INCLUDE_A_LETTER,
    Error IDENTIFIER_MUST_START_WITH_A_LETTER,
    Error IDENTIFIER_IS_NOT_VALID,
    Error MAP_ENTRY_NOT_ALLOWED,
    Error ENUM_CONSTRUCTOR_CALL_OUTSIDE_ENUM,
    Error INTERNAL_COMPILER_ERROR,
];
