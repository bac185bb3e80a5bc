//! Assembly identities and assembly-qualified type names.

use std::fmt;

use crate::{Error, Result};

/// The identity of an assembly: simple name, four-part version, culture and
/// public key token. This is what reference matching compares, independent of
/// where the assembly actually lives.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct AssemblyIdentity {
    /// Simple name, e.g. `SomeLibrary`.
    pub name: String,
    /// Major version.
    pub major: u16,
    /// Minor version.
    pub minor: u16,
    /// Build number.
    pub build: u16,
    /// Revision number.
    pub revision: u16,
    /// Culture name; `None` for the neutral culture.
    pub culture: Option<String>,
    /// Public key token (8 bytes); `None` for unsigned assemblies.
    pub public_key_token: Option<Vec<u8>>,
}

impl AssemblyIdentity {
    /// Construct an identity with the given name and version, neutral culture
    /// and no public key token.
    #[must_use]
    pub fn new(name: &str, major: u16, minor: u16, build: u16, revision: u16) -> Self {
        AssemblyIdentity {
            name: name.to_string(),
            major,
            minor,
            build,
            revision,
            culture: None,
            public_key_token: None,
        }
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, Version={}.{}.{}.{}, Culture={}, PublicKeyToken=",
            self.name,
            self.major,
            self.minor,
            self.build,
            self.revision,
            self.culture.as_deref().unwrap_or("neutral"),
        )?;

        match &self.public_key_token {
            None => write!(f, "null"),
            Some(token) => {
                for byte in token {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

/// A structured assembly-qualified type name, e.g.
/// `NS.Outer+Inner, SomeLibrary, Version=1.3.3.7, Culture=neutral,
/// PublicKeyToken=null`.
///
/// [`fmt::Display`] emits the canonical spelling: version, culture and public
/// key token are always written out, so parsing the displayed text yields an
/// equal value even when the source text omitted qualifiers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct TypeName {
    /// Namespace of the outermost type; empty for the global namespace.
    pub namespace: String,
    /// Name of the outermost type.
    pub name: String,
    /// Names of the nested types, outermost first.
    pub nested: Vec<String>,
    /// Declaring assembly, when the name is assembly-qualified.
    pub assembly: Option<AssemblyIdentity>,
}

impl TypeName {
    /// Parse an assembly-qualified type name.
    ///
    /// # Errors
    /// Returns an error if the name is empty or a qualifier is malformed.
    pub fn parse(text: &str) -> Result<Self> {
        let mut parts = text.split(',').map(str::trim);

        let Some(type_part) = parts.next().filter(|part| !part.is_empty()) else {
            return Err(malformed_error!("Empty type name - '{}'", text));
        };

        let mut segments = type_part.split('+');
        let outer = segments
            .next()
            .ok_or_else(|| malformed_error!("Empty type name - '{}'", text))?;
        let nested: Vec<String> = segments.map(str::to_string).collect();
        if nested.iter().any(String::is_empty) {
            return Err(malformed_error!("Empty nested type name - '{}'", text));
        }

        let (namespace, name) = match outer.rfind('.') {
            Some(dot) => (outer[..dot].to_string(), outer[dot + 1..].to_string()),
            None => (String::new(), outer.to_string()),
        };
        if name.is_empty() {
            return Err(malformed_error!("Empty type name - '{}'", text));
        }

        let assembly = match parts.next() {
            None => None,
            Some(assembly_name) if assembly_name.is_empty() => {
                return Err(malformed_error!("Empty assembly name - '{}'", text))
            }
            Some(assembly_name) => {
                let mut identity = AssemblyIdentity {
                    name: assembly_name.to_string(),
                    ..AssemblyIdentity::default()
                };

                for qualifier in parts {
                    let Some((key, value)) = qualifier.split_once('=') else {
                        return Err(malformed_error!(
                            "Invalid assembly qualifier - '{}'",
                            qualifier
                        ));
                    };

                    match key {
                        "Version" => {
                            let mut numbers = value.split('.');
                            let mut next = || -> Result<u16> {
                                numbers
                                    .next()
                                    .and_then(|n| n.parse().ok())
                                    .ok_or_else(|| {
                                        malformed_error!("Invalid version - '{}'", value)
                                    })
                            };
                            identity.major = next()?;
                            identity.minor = next()?;
                            identity.build = next()?;
                            identity.revision = next()?;
                        }
                        "Culture" => {
                            if value != "neutral" {
                                identity.culture = Some(value.to_string());
                            }
                        }
                        "PublicKeyToken" => {
                            if value != "null" {
                                identity.public_key_token = Some(parse_hex(value)?);
                            }
                        }
                        _ => {
                            return Err(malformed_error!(
                                "Unknown assembly qualifier - '{}'",
                                key
                            ))
                        }
                    }
                }

                Some(identity)
            }
        };

        Ok(TypeName {
            namespace,
            name,
            nested,
            assembly,
        })
    }

    /// The type part without the assembly qualifier, e.g. `NS.Outer+Inner`.
    #[must_use]
    pub fn full_name(&self) -> String {
        let mut result = if self.namespace.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.namespace, self.name)
        };

        for nested in &self.nested {
            result.push('+');
            result.push_str(nested);
        }

        result
    }
}

impl fmt::Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.full_name())?;
        if let Some(assembly) = &self.assembly {
            write!(f, ", {assembly}")?;
        }
        Ok(())
    }
}

fn parse_hex(text: &str) -> Result<Vec<u8>> {
    // All-ASCII input keeps the two-byte slices below on char boundaries
    if text.len() % 2 != 0 || !text.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(malformed_error!("Invalid public key token - '{}'", text));
    }

    (0..text.len())
        .step_by(2)
        .map(|index| {
            u8::from_str_radix(&text[index..index + 2], 16)
                .map_err(|_| malformed_error!("Invalid public key token - '{}'", text))
        })
        .collect::<std::result::Result<Vec<u8>, Error>>()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_name() {
        let name = TypeName::parse("System.Int32").unwrap();
        assert_eq!(name.namespace, "System");
        assert_eq!(name.name, "Int32");
        assert!(name.nested.is_empty());
        assert!(name.assembly.is_none());
        assert_eq!(name.to_string(), "System.Int32");
    }

    #[test]
    fn global_namespace_and_nesting() {
        let name = TypeName::parse("Outer+Inner+Innermost").unwrap();
        assert_eq!(name.namespace, "");
        assert_eq!(name.name, "Outer");
        assert_eq!(name.nested, vec!["Inner", "Innermost"]);
        assert_eq!(name.full_name(), "Outer+Inner+Innermost");
    }

    #[test]
    fn assembly_qualified_round_trip() {
        let text = "NS.SomeType, SomeLibrary, Version=1.3.3.7, Culture=en-GB, \
                    PublicKeyToken=0123456789abcdef";
        let name = TypeName::parse(text).unwrap();

        let assembly = name.assembly.as_ref().unwrap();
        assert_eq!(assembly.name, "SomeLibrary");
        assert_eq!(
            (assembly.major, assembly.minor, assembly.build, assembly.revision),
            (1, 3, 3, 7)
        );
        assert_eq!(assembly.culture.as_deref(), Some("en-GB"));
        assert_eq!(
            assembly.public_key_token.as_deref(),
            Some(&[0x01, 0x23, 0x45, 0x67, 0x89, 0xAB, 0xCD, 0xEF][..])
        );

        assert_eq!(name.to_string(), text);
    }

    #[test]
    fn neutral_culture_and_null_token() {
        let text = "System.Object, mscorlib, Version=4.0.0.0, Culture=neutral, \
                    PublicKeyToken=null";
        let name = TypeName::parse(text).unwrap();
        let assembly = name.assembly.as_ref().unwrap();
        assert!(assembly.culture.is_none());
        assert!(assembly.public_key_token.is_none());
        assert_eq!(TypeName::parse(&name.to_string()).unwrap(), name);
    }

    #[test]
    fn malformed_names() {
        assert!(TypeName::parse("").is_err());
        assert!(TypeName::parse("Outer+").is_err());
        assert!(TypeName::parse("NS.Type, Lib, Version=1.2").is_err());
        assert!(TypeName::parse("NS.Type, Lib, PublicKeyToken=xyz").is_err());
        // Multi-byte UTF-8 in the token must error, not split a character
        assert!(TypeName::parse("NS.Type, Lib, PublicKeyToken=\u{20AC}\u{20AC}").is_err());
    }
}
