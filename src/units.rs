//! serde adapters so metfor quantity fields encode as plain JSON numbers.

pub(crate) mod celsius {
    use metfor::{Celsius, Quantity};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(val: &Celsius, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.serialize_f64((*val).unpack())
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Celsius, D::Error>
    where
        D: Deserializer<'de>,
    {
        f64::deserialize(de).map(Celsius)
    }
}

pub(crate) mod mm {
    use metfor::{Mm, Quantity};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(val: &Mm, ser: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        ser.serialize_f64((*val).unpack())
    }

    pub fn deserialize<'de, D>(de: D) -> Result<Mm, D::Error>
    where
        D: Deserializer<'de>,
    {
        f64::deserialize(de).map(Mm)
    }
}
