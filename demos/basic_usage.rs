use serde::{Deserialize, Serialize};
use solrq::{
    EdismaxQuery, FacetTree, Group, GroupFacetQuery, GroupQuery, RangeMatch, RemoveQuery, Sort,
    SolrClient, StandardQuery, TermsFacet, UpdateRequest,
};
use std::collections::BTreeMap;

solrq::schema! {
    #[derive(Debug, Clone, Serialize, Deserialize)]
    pub struct Film {
        pub id: String,
        pub name: String,
        #[serde(default)]
        pub genre: Vec<String>,
        #[serde(default)]
        pub directed_by: Vec<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        pub initial_release_date: Option<String>,
    }
}

fn film(id: &str, name: &str, genre: &[&str], released: &str) -> Film {
    Film {
        id: id.to_string(),
        name: name.to_string(),
        genre: genre.iter().map(|g| g.to_string()).collect(),
        directed_by: Vec::new(),
        initial_release_date: Some(released.to_string()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("=== solrq Basic Usage Example ===\n");

    // Reads SOLR_BASE_URL, defaulting to http://localhost:8983/solr
    let client: SolrClient<Film> = SolrClient::new("films")?;

    println!("Loading documents...");
    client.remove(&RemoveQuery::query("*:*")).await?;
    let docs: Vec<UpdateRequest<Film>> = vec![
        film("1", "Inception", &["Sci-Fi", "Thriller"], "2010-07-16T00:00:00Z").into(),
        film("2", "Shutter Island", &["Thriller"], "2010-02-19T00:00:00Z").into(),
        film("3", "Interstellar", &["Sci-Fi"], "2014-11-07T00:00:00Z").into(),
    ];
    client.update(&docs).await?;
    println!("✓ Loaded {} documents\n", docs.len());

    // Example 1: relevance query restricted to 2010 releases
    println!("--- Example 1: edismax over genre, released in 2010 ---");
    let query = EdismaxQuery::new(
        StandardQuery::new()
            .q("thriller")
            .field(Film::id)
            .field(Film::name)
            .sort(Sort::desc(Film::id))
            .filter(client.date_range_match(
                Film::initial_release_date,
                RangeMatch::inclusive()
                    .from("2010-01-01T00:00:00.000Z")
                    .to("2010-12-31T23:59:59.999Z"),
            )),
    )
    .qf_weighted(Film::genre, 5.0);
    let response = client.select(&client.build_edismax_query(&query)).await?;
    println!("Found {} documents", response.response.num_found);
    for doc in &response.response.docs {
        println!("  {} {}", doc.id, doc.name);
    }

    // Example 2: group by name, one document per group
    println!("\n--- Example 2: group by name ---");
    let grouped = GroupQuery::new(
        StandardQuery::new(),
        Group::by(Film::name).limit(1).ngroups(true),
    );
    let response = client
        .group_query(&client.build_solr_group_query(&grouped))
        .await?;
    if let Some(list) = response.grouped.get("name") {
        for group in &list.groups {
            println!("  {} ({} films)", group.group_value, group.doclist.num_found);
        }
    }

    // Example 3: grouped query with genre facet counts
    println!("\n--- Example 3: genre facet ---");
    let mut facets: FacetTree<Film> = BTreeMap::new();
    facets.insert("genres".to_string(), TermsFacet::new(Film::genre, -1).into());
    let faceted = GroupFacetQuery::new(
        GroupQuery::new(StandardQuery::new(), Group::by(Film::name).truncate(true)),
        facets,
    );
    let response = client
        .group_facet_query(&client.build_solr_group_facet_query(&faceted)?)
        .await?;
    if let Some(genres) = response.facets.facet("genres") {
        for bucket in genres.buckets {
            println!("  {}: {}", bucket.val, bucket.count);
        }
    }

    println!("\n=== Example Complete ===");
    Ok(())
}
