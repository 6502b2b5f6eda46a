//! Decoder for consumer-protocol member assignments.
//!
//! DescribeGroups responses carry each member's partition assignment as the
//! opaque bytes the group leader serialized: a big-endian version, an array
//! of topics each holding a name and a partition array, then trailing user
//! data. Only the topic array matters here.

use std::io::{Cursor, Read};

use byteorder::{BigEndian, ReadBytesExt};
use lagwatch_admin::TopicPartition;

/// Decodes the partitions assigned to one member.
///
/// An empty blob means no assignment, which is normal for a group that is
/// mid-rebalance or not using the consumer protocol.
pub(crate) fn decode_member_assignment(
    blob: &[u8],
) -> Result<Vec<TopicPartition>, &'static str> {
    if blob.is_empty() {
        return Ok(Vec::new());
    }

    let mut cursor = Cursor::new(blob);
    let _version = cursor
        .read_i16::<BigEndian>()
        .map_err(|_| "truncated version")?;

    let topic_count = read_array_len(&mut cursor, "bad topic count")?;
    let mut assigned = Vec::new();
    for _ in 0..topic_count {
        let topic = read_string(&mut cursor)?;
        let partition_count = read_array_len(&mut cursor, "bad partition count")?;
        for _ in 0..partition_count {
            let partition = cursor
                .read_i32::<BigEndian>()
                .map_err(|_| "truncated partition")?;
            assigned.push(TopicPartition::new(topic.clone(), partition));
        }
    }

    // Anything left is user data, which is opaque and ignored.
    Ok(assigned)
}

fn read_array_len(cursor: &mut Cursor<&[u8]>, what: &'static str) -> Result<usize, &'static str> {
    let len = cursor.read_i32::<BigEndian>().map_err(|_| what)?;
    usize::try_from(len).map_err(|_| what)
}

fn read_string(cursor: &mut Cursor<&[u8]>) -> Result<String, &'static str> {
    let len = cursor
        .read_i16::<BigEndian>()
        .map_err(|_| "truncated string length")?;
    let len = usize::try_from(len).map_err(|_| "negative string length")?;

    let mut buf = vec![0u8; len];
    cursor
        .read_exact(&mut buf)
        .map_err(|_| "truncated string")?;
    String::from_utf8(buf).map_err(|_| "topic name is not utf-8")
}

#[cfg(test)]
mod tests {
    use byteorder::WriteBytesExt;

    use super::*;

    fn encode(topics: &[(&str, &[i32])], user_data: Option<&[u8]>) -> Vec<u8> {
        let mut buf = Vec::new();
        buf.write_i16::<BigEndian>(1).unwrap();
        buf.write_i32::<BigEndian>(i32::try_from(topics.len()).unwrap())
            .unwrap();
        for (topic, partitions) in topics {
            buf.write_i16::<BigEndian>(i16::try_from(topic.len()).unwrap())
                .unwrap();
            buf.extend_from_slice(topic.as_bytes());
            buf.write_i32::<BigEndian>(i32::try_from(partitions.len()).unwrap())
                .unwrap();
            for partition in *partitions {
                buf.write_i32::<BigEndian>(*partition).unwrap();
            }
        }
        if let Some(user_data) = user_data {
            buf.write_i32::<BigEndian>(i32::try_from(user_data.len()).unwrap())
                .unwrap();
            buf.extend_from_slice(user_data);
        }
        buf
    }

    #[test]
    fn test_decodes_multiple_topics() {
        let blob = encode(&[("orders", &[0, 2]), ("payments", &[1])], None);

        let assigned = decode_member_assignment(&blob).unwrap();
        assert_eq!(
            assigned,
            vec![
                TopicPartition::new("orders", 0),
                TopicPartition::new("orders", 2),
                TopicPartition::new("payments", 1),
            ]
        );
    }

    #[test]
    fn test_empty_blob_means_no_assignment() {
        assert_eq!(decode_member_assignment(&[]).unwrap(), Vec::new());
    }

    #[test]
    fn test_empty_topic_array_decodes_to_nothing() {
        let blob = encode(&[], None);
        assert_eq!(decode_member_assignment(&blob).unwrap(), Vec::new());
    }

    #[test]
    fn test_trailing_user_data_is_ignored() {
        let blob = encode(&[("orders", &[0])], Some(b"leader-epoch-state"));

        let assigned = decode_member_assignment(&blob).unwrap();
        assert_eq!(assigned, vec![TopicPartition::new("orders", 0)]);
    }

    #[test]
    fn test_truncated_blob_is_rejected() {
        let mut blob = encode(&[("orders", &[0, 1, 2])], None);
        blob.truncate(blob.len() - 2);

        assert_eq!(decode_member_assignment(&blob), Err("truncated partition"));
    }

    #[test]
    fn test_negative_string_length_is_rejected() {
        let mut blob = Vec::new();
        blob.write_i16::<BigEndian>(1).unwrap();
        blob.write_i32::<BigEndian>(1).unwrap();
        blob.write_i16::<BigEndian>(-1).unwrap();

        assert_eq!(
            decode_member_assignment(&blob),
            Err("negative string length")
        );
    }

    #[test]
    fn test_non_utf8_topic_name_is_rejected() {
        let mut blob = Vec::new();
        blob.write_i16::<BigEndian>(1).unwrap();
        blob.write_i32::<BigEndian>(1).unwrap();
        blob.write_i16::<BigEndian>(2).unwrap();
        blob.extend_from_slice(&[0xff, 0xfe]);

        assert_eq!(
            decode_member_assignment(&blob),
            Err("topic name is not utf-8")
        );
    }
}
