use sqlx::postgres::{PgConnectOptions, PgConnection};
use sqlx::{ConnectOptions, Connection};
use tokio::runtime::Runtime;
use tracing::info;
use crate::{
    Aspect, AnnotationCall, ConnectionSettings, CoordinateRange, Error, FeatureLocation, Gene, GeneUniverse,
    OrthologyCall, ReportConfig, Result, SequenceLookup, Store, TranscriptFilter,
};

/// Joins shared by every query over the gene universe. Binds $1..$4.
const UNIVERSE_FROM: &str = "
    from feature gene join cvterm gene_type on (gene.type_id = gene_type.cvterm_id)
                      join organism gene_org on (gene.organism_id = gene_org.organism_id)";

const UNIVERSE_WHERE: &str = "
    where gene.uniquename ~ $1
      and gene_type.name = $2
      and gene_org.genus = $3
      and gene_org.species = $4
      and gene.is_obsolete = false
      and gene.is_analysis = false
      and exists (select 1 from featureloc fl where fl.feature_id = gene.feature_id)";

const ANNOTATION_CALLS: &str = "
    select cvt.name as term,
           coalesce(ev_code.value, '') as evidence,
           exists (select 1
                     from feature_cvtermprop fcvtp join cvterm fcvtp_type on (fcvtp.type_id = fcvtp_type.cvterm_id)
                     where fcvtp.feature_cvterm_id = fcvt.feature_cvterm_id
                       and fcvtp_type.name = $3) as negated
      from feature f join feature_cvterm fcvt on (f.feature_id = fcvt.feature_id)
                     join cvterm cvt on (fcvt.cvterm_id = cvt.cvterm_id)
                     join cv on (cvt.cv_id = cv.cv_id)
                     join feature_cvtermprop ev_code on (fcvt.feature_cvterm_id = ev_code.feature_cvterm_id)
                     join cvterm ev_code_type on (ev_code.type_id = ev_code_type.cvterm_id)
      where f.uniquename = $1
        and cv.name = $2
        and ev_code_type.name = $4";

const SEQUENCE_IDS: &str = "
    select f.feature_id::bigint as feature_id
      from feature f join organism o on (f.organism_id = o.organism_id)
                     join cvterm cvt on (f.type_id = cvt.cvterm_id)
      where o.genus = $1
        and o.species = $2
        and cvt.name = $3
        and f.is_obsolete = false
        and f.is_analysis = false
        and f.name = $4";

/// Overlap is half-open: `fmin < query max and query min < fmax`.
const OVERLAPPING_FEATURES: &str = "
    select f.uniquename as feature_id,
           flybase.current_symbol(f.uniquename) as symbol,
           cvt.name as feature_type,
           f.is_obsolete,
           f.is_analysis,
           fl.fmin::bigint as fmin,
           fl.fmax::bigint as fmax
      from featureloc fl join feature f on (fl.feature_id = f.feature_id)
                         join cvterm cvt on (f.type_id = cvt.cvterm_id)
      where fl.srcfeature_id = $1
        and fl.fmin < $3
        and $2 < fl.fmax
        and f.uniquename ~ $4
        and cvt.name = any($5)
        and f.is_obsolete = false
        and f.is_analysis = false";

#[derive(sqlx::FromRow)]
struct GeneSqlRow {
    gene_id: String,
    symbol: Option<String>,
}

#[derive(sqlx::FromRow)]
struct AnnotationSqlRow {
    term: String,
    evidence: String,
    negated: bool,
}

#[derive(sqlx::FromRow)]
struct OrthologySqlRow {
    gene_id: String,
    source_tag: String,
    relationship: String,
    organism_id: i64,
}

#[derive(sqlx::FromRow)]
struct FeatureLocationSqlRow {
    feature_id: String,
    symbol: Option<String>,
    feature_type: String,
    is_obsolete: bool,
    is_analysis: bool,
    fmin: i64,
    fmax: i64,
}

/// A Chado database reached over PostgreSQL.
///
/// Holds a single connection for the whole run and drives it from a private
/// current-thread runtime, so callers stay synchronous.
pub struct ChadoStore {
    runtime: Runtime,
    conn: PgConnection,
    negation_qualifier: String,
    evidence_property: String,
    relationship: String,
    transcripts: TranscriptFilter,
}

impl ChadoStore {
    pub fn connect(config: &ReportConfig) -> Result<ChadoStore> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let settings = &config.connection;
        info!(host = %settings.host, port = settings.port, dbname = %settings.dbname, user = %settings.user, "connecting to chado");
        let conn = runtime.block_on(connect_options(settings).connect())
            .map_err(|e| Error::Connection(e.to_string()))?;

        Ok(ChadoStore {
            runtime,
            conn,
            negation_qualifier: config.evidence.negation_qualifier.clone(),
            evidence_property: config.evidence.evidence_property.clone(),
            relationship: config.conservation.relationship.clone(),
            transcripts: TranscriptFilter::from_config(config)?,
        })
    }

    /// Closes the connection, telling the server we are done.
    pub fn close(self) -> Result<()> {
        let ChadoStore { runtime, conn, .. } = self;
        runtime.block_on(conn.close())?;
        info!("closed chado connection");
        Ok(())
    }
}

fn connect_options(settings: &ConnectionSettings) -> PgConnectOptions {
    let options = PgConnectOptions::new()
        .host(&settings.host)
        .port(settings.port)
        .username(&settings.user)
        .database(&settings.dbname)
        .application_name("fbreport");
    match &settings.password {
        Some(password) => options.password(password),
        None => options,
    }
}

impl Store for ChadoStore {
    fn universe_genes(&mut self, universe: &GeneUniverse) -> Result<Vec<Gene>> {
        let sql = format!(
            "select gene.uniquename as gene_id, flybase.current_symbol(gene.uniquename) as symbol {} {} order by gene.uniquename",
            UNIVERSE_FROM, UNIVERSE_WHERE,
        );
        let rows: Vec<GeneSqlRow> = self.runtime.block_on(
            sqlx::query_as(&sql)
                .bind(universe.accession_pattern())
                .bind(&universe.gene_type)
                .bind(&universe.genus)
                .bind(&universe.species)
                .fetch_all(&mut self.conn)
        )?;
        Ok(rows.into_iter()
            .map(|row| Gene { gene_id: row.gene_id, symbol: row.symbol })
            .collect())
    }

    fn annotation_calls(&mut self, gene_id: &str, aspect: Aspect) -> Result<Vec<AnnotationCall>> {
        let rows: Vec<AnnotationSqlRow> = self.runtime.block_on(
            sqlx::query_as(ANNOTATION_CALLS)
                .bind(gene_id)
                .bind(aspect.cv_name())
                .bind(&self.negation_qualifier)
                .bind(&self.evidence_property)
                .fetch_all(&mut self.conn)
        )?;
        Ok(rows.into_iter()
            .map(|row| AnnotationCall {
                gene_id: gene_id.to_string(),
                aspect,
                term: row.term,
                evidence: row.evidence,
                negated: row.negated,
            })
            .collect())
    }

    fn orthology_calls(&mut self, universe: &GeneUniverse, source_tag: &str) -> Result<Vec<OrthologyCall>> {
        let sql = format!(
            "select gene.uniquename as gene_id,
                    frp.value as source_tag,
                    fr_type.name as relationship,
                    ortholog.organism_id::bigint as organism_id
             {}
                      join feature_relationship ortho_rel on (gene.feature_id = ortho_rel.object_id)
                      join feature ortholog on (ortho_rel.subject_id = ortholog.feature_id)
                      join cvterm fr_type on (ortho_rel.type_id = fr_type.cvterm_id)
                      join feature_relationshipprop frp on (ortho_rel.feature_relationship_id = frp.feature_relationship_id)
             {}
               and ortholog.is_obsolete = false
               and ortholog.is_analysis = false
               and fr_type.name = $5
               and frp.value = $6",
            UNIVERSE_FROM, UNIVERSE_WHERE,
        );
        let rows: Vec<OrthologySqlRow> = self.runtime.block_on(
            sqlx::query_as(&sql)
                .bind(universe.accession_pattern())
                .bind(&universe.gene_type)
                .bind(&universe.genus)
                .bind(&universe.species)
                .bind(&self.relationship)
                .bind(source_tag)
                .fetch_all(&mut self.conn)
        )?;
        Ok(rows.into_iter()
            .map(|row| OrthologyCall {
                gene_id: row.gene_id,
                source_tag: row.source_tag,
                relationship: row.relationship,
                organism_id: row.organism_id,
            })
            .collect())
    }

    fn sequence_ids(&mut self, lookup: &SequenceLookup, name: &str) -> Result<Vec<i64>> {
        let ids: Vec<(i64,)> = self.runtime.block_on(
            sqlx::query_as(SEQUENCE_IDS)
                .bind(&lookup.genus)
                .bind(&lookup.species)
                .bind(&lookup.sequence_type)
                .bind(name)
                .fetch_all(&mut self.conn)
        )?;
        Ok(ids.into_iter().map(|(id,)| id).collect())
    }

    fn overlapping_features(&mut self, sequence_id: i64, range: &CoordinateRange) -> Result<Vec<FeatureLocation>> {
        let rows: Vec<FeatureLocationSqlRow> = self.runtime.block_on(
            sqlx::query_as(OVERLAPPING_FEATURES)
                .bind(sequence_id)
                .bind(range.fmin)
                .bind(range.fmax)
                .bind(self.transcripts.accession_pattern())
                .bind(self.transcripts.types())
                .fetch_all(&mut self.conn)
        )?;
        Ok(rows.into_iter()
            .map(|row| FeatureLocation {
                feature_id: row.feature_id,
                symbol: row.symbol,
                feature_type: row.feature_type,
                is_obsolete: row.is_obsolete,
                is_analysis: row.is_analysis,
                fmin: row.fmin,
                fmax: row.fmax,
            })
            .collect())
    }
}
