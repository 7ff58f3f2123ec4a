mod common;

use common::StubClient;
use m3u_curator::config::ProbeConfig;
use m3u_curator::models::{ChannelRecord, GroupTag};
use m3u_curator::playlist::{PlaylistGenerator, PlaylistRewriter};
use m3u_curator::services::StreamProber;
use m3u_curator::sources::M3uParser;
use proptest::prelude::*;
use std::collections::HashSet;

const TEN_LINE_PLAYLIST: &str = "#EXTM3U
# ========== Sports Channels ==========

#EXTINF:-1 tvg-name=\"Sport One\" group-title=\"Sports\",Sport One
#EXTINF:-1 tvg-name=\"Dead One\" group-title=\"Sports\",Dead One
http://dead.example/live
#EXTINF:-1 tvg-name=\"Sport Two\" group-title=\"Sports\",Sport Two
http://ok.example/two

# end of list
";

fn pairs(records: &[ChannelRecord]) -> HashSet<(String, String)> {
    records
        .iter()
        .map(|r| (r.name().to_string(), r.endpoint().to_string()))
        .collect()
}

#[tokio::test]
async fn test_prune_removes_exactly_the_dead_lines() {
    // Line 4 is a descriptor replaced by line 5 before any URL, so only the
    // pair on lines 5-6 and the pair on lines 7-8 are decoded
    let records = M3uParser::new().parse(TEN_LINE_PLAYLIST);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].source_line(), Some(5));
    assert_eq!(records[0].endpoint_line(), Some(6));

    let prober = StreamProber::new(StubClient::by_host(), &ProbeConfig::default());
    let results = prober.probe_all(&records).await;
    let pruned = PlaylistRewriter::from_results(TEN_LINE_PLAYLIST, &results).prune();

    let original: Vec<&str> = TEN_LINE_PLAYLIST.split_inclusive('\n').collect();
    assert_eq!(original.len(), 10);
    let expected: String = original
        .iter()
        .enumerate()
        .filter(|(i, _)| *i + 1 != 5 && *i + 1 != 6)
        .map(|(_, line)| *line)
        .collect();
    assert_eq!(pruned, expected);
}

#[tokio::test]
async fn test_working_split_keeps_structure() {
    let records = M3uParser::new().parse(TEN_LINE_PLAYLIST);
    let prober = StreamProber::new(StubClient::by_host(), &ProbeConfig::default());
    let results = prober.probe_all(&records).await;

    let working = PlaylistRewriter::from_results(TEN_LINE_PLAYLIST, &results).working();
    assert_eq!(
        working,
        "#EXTM3U
# ========== Sports Channels ==========

#EXTINF:-1 tvg-name=\"Sport Two\" group-title=\"Sports\",Sport Two
http://ok.example/two

# end of list
"
    );
}

#[tokio::test]
async fn test_working_split_keeps_lines_around_unpaired_descriptors() {
    let playlist = "#EXTM3U
#EXTINF:-1 tvg-name=\"Orphan\" group-title=\"News\",Orphan
# ========== News Channels ==========

#EXTINF:-1 tvg-name=\"News One\" group-title=\"News\",News One
http://ok.example/news
#EXTINF:-1 tvg-name=\"Gone\" group-title=\"News\",Gone
http://dead.example/gone
#EXTINF:-1 tvg-name=\"Tail\" group-title=\"News\",Tail
# maintained by the curators
# end
";
    let records = M3uParser::new().parse(playlist);
    assert_eq!(records.len(), 2);

    let prober = StreamProber::new(StubClient::by_host(), &ProbeConfig::default());
    let results = prober.probe_all(&records).await;
    let working = PlaylistRewriter::from_results(playlist, &results).working();

    assert_eq!(
        working,
        "#EXTM3U
# ========== News Channels ==========

#EXTINF:-1 tvg-name=\"News One\" group-title=\"News\",News One
http://ok.example/news
# maintained by the curators
# end
"
    );
}

fn group_tag() -> impl Strategy<Value = GroupTag> {
    prop_oneof![
        Just(GroupTag::Sports),
        Just(GroupTag::Entertainment),
        Just(GroupTag::News),
        Just(GroupTag::General),
        "[A-Z][a-z]{2,8}".prop_map(GroupTag::Custom),
    ]
}

fn channel_record() -> impl Strategy<Value = ChannelRecord> {
    (
        "[A-Z][a-z0-9]{0,6}( [A-Z0-9][a-z0-9]{0,4})?",
        "(http|https|rtmp)://[a-z]{1,8}\\.example/[a-z0-9]{1,6}",
        proptest::option::of("[A-Za-z0-9][A-Za-z0-9 ]{0,8}[A-Za-z0-9]"),
        group_tag(),
        proptest::option::of("[0-9]{1,3}"),
        proptest::option::of("http://l\\.example/[a-z]{1,5}\\.png"),
    )
        .prop_map(|(name, endpoint, title, group, epg_id, logo)| {
            ChannelRecord::new(name, endpoint)
                .unwrap()
                .with_title(title.unwrap_or_default())
                .with_group(group)
                .with_epg_id(epg_id)
                .with_logo(logo)
        })
}

type Fields = (String, String, String, String, Option<String>, Option<String>);

fn fields(records: &[ChannelRecord]) -> Vec<Fields> {
    let mut fields: Vec<Fields> = records
        .iter()
        .map(|r| {
            (
                r.name().to_string(),
                r.endpoint().to_string(),
                r.title().to_string(),
                r.group().label().to_string(),
                r.epg_id().map(str::to_string),
                r.logo().map(str::to_string),
            )
        })
        .collect();
    fields.sort();
    fields
}

proptest! {
    #[test]
    fn test_generated_playlist_decodes_to_same_records(
        records in proptest::collection::vec(channel_record(), 1..20)
    ) {
        let encoded = PlaylistGenerator::now().generate(&records, 0);
        let decoded = M3uParser::new().parse(&encoded);
        prop_assert_eq!(fields(&decoded), fields(&records));

        let reencoded = PlaylistGenerator::now().generate(&decoded, 0);
        let redecoded = M3uParser::new().parse(&reencoded);
        prop_assert_eq!(fields(&redecoded), fields(&decoded));
    }
}

#[test]
fn test_decode_encode_decode_preserves_pairs() {
    let playlist = "#EXTM3U
#EXTINF:-1 tvg-id=\"7\" tvg-name=\"MBC 1\" tvg-logo=\"http://l.example/1.png\" group-title=\"Entertainment\",MBC One
http://a.example/1
#EXTINF:-1 tvg-name=\"Kids Zone\" group-title=\"Kids\",Kids Zone
rtmp://b.example/live

http://c.example/bare
#EXTINF:-1 tvg-name=\"Sky News\" group-title=\"News\",Sky News
https://d.example/index.m3u8
";
    let first = M3uParser::new().parse(playlist);
    assert_eq!(first.len(), 4);

    let encoded = PlaylistGenerator::now().generate(&first, 0);
    let second = M3uParser::new().parse(&encoded);

    assert_eq!(pairs(&first), pairs(&second));

    let mbc = second.iter().find(|r| r.name() == "MBC 1").unwrap();
    assert_eq!(mbc.epg_id(), Some("7"));
    assert_eq!(mbc.logo(), Some("http://l.example/1.png"));
    assert_eq!(mbc.title(), "MBC One");
}
