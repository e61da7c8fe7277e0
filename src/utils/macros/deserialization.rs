//! Case-insensitive `{"type", "value"}` enums.

/// Implements `Deserialize` for an enum of single-string variants written as
/// `{"type": <tag>, "value": <string>}`, matching the tag case-insensitively.
///
/// Keys other than `type` and `value` are rejected. Each variant is built with
/// `<payload>::from(String)`.
#[macro_export]
macro_rules! impl_case_insensitive_enum {
	($enum_name:ident, { $($tag:expr => $variant:ident),* $(,)? }) => {
		impl<'de> ::serde::Deserialize<'de> for $enum_name {
			fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
			where
				D: ::serde::Deserializer<'de>,
			{
				use ::serde::de::{self, MapAccess, Visitor};

				const TAGS: &[&str] = &[$($tag),*];

				struct TaggedVisitor;

				impl<'de> Visitor<'de> for TaggedVisitor {
					type Value = $enum_name;

					fn expecting(&self, f: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
						write!(
							f,
							"an object with `type` and `value` for {}",
							stringify!($enum_name)
						)
					}

					fn visit_map<M: MapAccess<'de>>(self, mut map: M) -> Result<Self::Value, M::Error> {
						let mut tag: Option<String> = None;
						let mut value: Option<String> = None;

						while let Some(key) = map.next_key::<String>()? {
							match key.as_str() {
								"type" => tag = Some(map.next_value()?),
								"value" => value = Some(map.next_value()?),
								other => return Err(de::Error::unknown_field(other, &["type", "value"])),
							}
						}

						let tag = tag.ok_or_else(|| de::Error::missing_field("type"))?;
						let value = value.ok_or_else(|| de::Error::missing_field("value"))?;
						match tag.to_lowercase().as_str() {
							$($tag => Ok($enum_name::$variant(value.into())),)*
							_ => Err(de::Error::unknown_variant(&tag, TAGS)),
						}
					}
				}

				deserializer.deserialize_map(TaggedVisitor)
			}
		}
	};
}
