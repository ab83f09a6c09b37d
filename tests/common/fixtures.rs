//! Static findings corpora used across harnesses.

/// Two findings in the current narrow schema.
pub const NARROW_CSV: &str = "date_utc,message_id,url,keywords,snippet\n\
2024-01-01,1,http://a,x|y,hello\n\
2024-01-02,2,http://b,y,world\n";

/// The older wide schema, with course links and coupon codes.
pub const WIDE_CSV: &str = "date_utc,message_id,url,keywords,snippet,udemy_urls,coupon_codes\n\
2024-02-10T08:15:00Z,101,https://t.me/c/101,rust|async,Free course,https://udemy.com/a;https://udemy.com/b,FREE1;FREE2\n\
2024-02-11T09:00:00Z,102,https://t.me/c/102,python,Another one,,\n";

/// First schema revision: `keyword` instead of `keywords`, and ragged rows.
pub const V1_CSV: &str = "date_utc,message_id,url,keyword,snippet\n\
2023-12-31 22:00:00,7,https://t.me/c/7,legacy,old row\n\
2023-12-31 23:30:00,8\n";

/// Findings straddling a day boundary, for inclusive date filters.
pub const BOUNDARY_CSV: &str = "date_utc,message_id,url,keywords,snippet\n\
2024-02-29T23:59:59Z,a,,k,before\n\
2024-03-01T00:00:00Z,b,,k,start\n\
2024-03-01T23:00:00Z,c,,k,late\n\
2024-03-02T00:00:01Z,d,,k,after\n\
not a date,e,,k,undated\n";

/// Build a narrow-schema file with `n` rows, keywords cycling through a small set.
pub fn generated_csv(n: usize) -> String {
    const KEYWORDS: [&str; 4] = ["rust", "go|rust", "python", "js|ts"];
    let mut out = String::from("date_utc,message_id,url,keywords,snippet\n");
    for i in 0..n {
        out.push_str(&format!(
            "2024-01-{:02}T{:02}:00:00Z,{i},https://t.me/c/{i},{},snippet {i}\n",
            i % 28 + 1,
            i % 24,
            KEYWORDS[i % KEYWORDS.len()],
        ));
    }
    out
}
