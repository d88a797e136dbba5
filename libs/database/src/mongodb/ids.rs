use mongodb::bson::{Binary, Bson, spec::BinarySubtype};
use uuid::Uuid;

/// Encode a `Uuid` the way the driver stores it.
///
/// Collections serialize documents with the raw, non human-readable BSON
/// serializer, where `uuid::Uuid` becomes generic binary. `bson::to_bson`
/// is human-readable and yields a string, which never matches a stored id.
pub fn uuid_as_bson(id: &Uuid) -> Bson {
    Bson::Binary(Binary {
        subtype: BinarySubtype::Generic,
        bytes: id.as_bytes().to_vec(),
    })
}

/// Encode a list of ids for `$in` filters
pub fn uuids_as_bson(ids: &[Uuid]) -> Vec<Bson> {
    ids.iter().map(uuid_as_bson).collect()
}
