/// Canonical club names and the spellings that should resolve to them.
/// Canonical names must be distinct after cleaning.
pub static TEAM_ALIASES: &[(&str, &[&str])] = &[
    // English
    ("man utd", &["manchester united", "man united", "manchester utd", "mufc"]),
    ("man city", &["manchester city", "manchester c", "mcfc"]),
    ("spurs", &["tottenham", "tottenham hotspur", "tottenham hotspurs"]),
    ("wolves", &["wolverhampton", "wolverhampton wanderers"]),
    ("west ham", &["west ham united", "west ham utd"]),
    ("newcastle", &["newcastle united", "newcastle utd"]),
    ("brighton", &["brighton & hove albion", "brighton hove albion", "brighton & hove"]),
    ("nottingham forest", &["nottm forest", "nott'm forest", "nottingham", "forest"]),
    ("luton", &["luton town"]),
    ("sheffield utd", &["sheffield united"]),
    ("crystal palace", &["c palace", "c. palace"]),
    ("arsenal", &["arsenal fc"]),
    ("chelsea", &["chelsea fc"]),
    ("liverpool", &["liverpool fc"]),
    ("everton", &["everton fc"]),
    ("aston villa", &["villa"]),
    ("bournemouth", &["afc bournemouth"]),
    ("burnley", &["burnley fc"]),
    ("fulham", &["fulham fc"]),
    ("brentford", &["brentford fc"]),
    ("ipswich", &["ipswich town"]),
    ("leicester", &["leicester city"]),
    ("southampton", &["southampton fc"]),
    // German
    ("bayern", &["bayern munich", "bayern münchen", "fc bayern", "bayern munchen"]),
    ("dortmund", &["borussia dortmund", "bvb", "bvb dortmund"]),
    ("leverkusen", &["bayer leverkusen", "bayer 04", "bayer 04 leverkusen"]),
    ("gladbach", &["borussia mönchengladbach", "borussia m'gladbach", "m'gladbach", "monchengladbach", "borussia monchengladbach"]),
    ("frankfurt", &["eintracht frankfurt", "e. frankfurt"]),
    ("rb leipzig", &["leipzig", "rasenballsport leipzig"]),
    ("wolfsburg", &["vfl wolfsburg"]),
    ("freiburg", &["sc freiburg"]),
    ("hoffenheim", &["tsg hoffenheim", "tsg 1899 hoffenheim"]),
    ("mainz", &["mainz 05", "1. fsv mainz 05"]),
    ("augsburg", &["fc augsburg"]),
    ("bremen", &["werder bremen", "sv werder bremen"]),
    ("koln", &["fc köln", "fc koln", "1. fc koln", "1. fc köln", "cologne"]),
    ("union berlin", &["1. fc union berlin", "fc union berlin"]),
    ("bochum", &["vfl bochum"]),
    ("heidenheim", &["fc heidenheim", "1. fc heidenheim"]),
    ("st pauli", &["fc st. pauli", "fc st pauli", "st. pauli"]),
    ("holstein kiel", &["kiel", "holstein"]),
    // Spanish
    ("real madrid", &["r madrid", "r. madrid", "madrid"]),
    ("barcelona", &["fc barcelona", "barca", "barça"]),
    ("atletico", &["atletico madrid", "atlético madrid", "atl madrid", "atl. madrid", "atletico de madrid"]),
    ("real betis", &["betis"]),
    ("athletic", &["athletic bilbao", "athletic club"]),
    ("celta", &["celta vigo", "rc celta"]),
    ("real sociedad", &["r sociedad", "r. sociedad", "sociedad"]),
    ("villarreal", &["villarreal cf"]),
    ("sevilla", &["sevilla fc"]),
    ("valencia", &["valencia cf"]),
    ("mallorca", &["rcd mallorca"]),
    ("osasuna", &["ca osasuna"]),
    ("getafe", &["getafe cf"]),
    ("rayo vallecano", &["rayo", "vallecano"]),
    ("alaves", &["deportivo alaves", "deportivo alavés"]),
    ("las palmas", &["ud las palmas"]),
    ("girona", &["girona fc"]),
    ("leganes", &["cd leganes", "cd leganés"]),
    ("espanyol", &["rcd espanyol"]),
    ("valladolid", &["real valladolid"]),
    // Italian
    ("inter", &["inter milan", "internazionale", "fc internazionale", "inter milano"]),
    ("ac milan", &["milan"]),
    ("juventus", &["juve"]),
    ("napoli", &["ssc napoli"]),
    ("roma", &["as roma"]),
    ("lazio", &["ss lazio"]),
    ("atalanta", &["atalanta bc", "atalanta bergamo"]),
    ("fiorentina", &["acf fiorentina"]),
    ("torino", &["torino fc"]),
    ("bologna", &["bologna fc"]),
    ("verona", &["hellas verona"]),
    ("udinese", &["udinese calcio"]),
    ("empoli", &["empoli fc"]),
    ("lecce", &["us lecce"]),
    ("genoa", &["genoa cfc"]),
    ("monza", &["ac monza"]),
    ("cagliari", &["cagliari calcio"]),
    ("parma", &["parma calcio"]),
    ("como", &["como 1907"]),
    ("venezia", &["venezia fc"]),
    // French
    ("psg", &["paris saint-germain", "paris saint germain", "paris sg", "paris"]),
    ("marseille", &["olympique marseille", "om", "olympique de marseille"]),
    ("lyon", &["olympique lyonnais", "olympique lyon", "ol"]),
    ("monaco", &["as monaco"]),
    ("lille", &["losc lille", "losc"]),
    ("nice", &["ogc nice"]),
    ("lens", &["rc lens"]),
    ("rennes", &["stade rennais", "stade rennais fc"]),
    ("strasbourg", &["rc strasbourg", "rc strasbourg alsace"]),
    ("nantes", &["fc nantes"]),
    ("reims", &["stade de reims"]),
    ("toulouse", &["toulouse fc"]),
    ("montpellier", &["montpellier hsc"]),
    ("brest", &["stade brestois", "stade brestois 29"]),
    ("le havre", &["le havre ac"]),
    ("auxerre", &["aj auxerre"]),
    ("angers", &["angers sco"]),
    ("st etienne", &["as saint-etienne", "as saint etienne", "saint-etienne", "saint etienne"]),
    // Dutch
    ("ajax", &["afc ajax"]),
    ("psv", &["psv eindhoven"]),
    ("feyenoord", &["feyenoord rotterdam"]),
    ("az", &["az alkmaar"]),
    ("twente", &["fc twente"]),
    ("utrecht", &["fc utrecht"]),
    // Portuguese
    ("benfica", &["sl benfica"]),
    ("porto", &["fc porto"]),
    ("sporting", &["sporting cp", "sporting lisbon"]),
    ("braga", &["sc braga", "sporting braga"]),
    // Israeli
    ("maccabi ta", &["maccabi tel aviv", "maccabi tel-aviv", "m. tel aviv", "maccabi t.a"]),
    ("hapoel ta", &["hapoel tel aviv", "hapoel tel-aviv", "h. tel aviv", "hapoel t.a"]),
    ("beitar", &["beitar jerusalem", "beitar j'lem", "beitar j'salem"]),
    ("maccabi haifa", &["m haifa", "m. haifa"]),
    ("hapoel bs", &["hapoel beer sheva", "hapoel be'er sheva", "h. beer sheva", "hapoel b.s", "hapoel beer-sheva"]),
    ("hapoel haifa", &["h. haifa", "h haifa"]),
    ("bnei sakhnin", &["b. sakhnin", "sakhnin"]),
    ("maccabi netanya", &["m. netanya", "m netanya"]),
    ("maccabi petah tikva", &["m. petah tikva", "maccabi pt", "m petah tikva", "maccabi p.t"]),
    ("hapoel jerusalem", &["h. jerusalem", "hapoel j'lem"]),
    ("fc ashdod", &["ashdod", "ms ashdod", "m.s. ashdod", "ironi ashdod"]),
    ("bnei yehuda", &["bnei yehuda ta", "bnei yehuda tel aviv"]),
    ("hapoel kfar saba", &["h. kfar saba", "kfar saba"]),
    ("hapoel raanana", &["h. ra'anana", "raanana", "hapoel ra'anana"]),
    ("hapoel hadera", &["h. hadera", "hadera"]),
    ("ironi kiryat shmona", &["kiryat shmona", "hapoel kiryat shmona"]),
    ("sektzia nes tziona", &["nes tziona", "sektzia"]),
    ("hapoel afula", &["h. afula", "afula"]),
    ("hapoel petah tikva", &["h. petah tikva", "hapoel p.t"]),
    ("hapoel nof hagalil", &["nof hagalil", "h. nof hagalil"]),
    // Scottish
    ("celtic", &["celtic fc", "celtic glasgow"]),
    ("rangers", &["rangers fc", "glasgow rangers"]),
    ("hearts", &["heart of midlothian", "hearts fc"]),
    ("hibernian", &["hibs"]),
    ("aberdeen", &["aberdeen fc"]),
    // Belgian
    ("club brugge", &["club bruges", "brugge"]),
    ("anderlecht", &["rsc anderlecht"]),
    ("genk", &["krc genk", "racing genk"]),
    ("standard", &["standard liege", "standard liège"]),
    ("gent", &["kaa gent"]),
    // Turkish
    ("galatasaray", &["galatasaray sk"]),
    ("fenerbahce", &["fenerbahçe", "fenerbahce sk"]),
    ("besiktas", &["beşiktaş", "besiktas jk"]),
    ("trabzonspor", &["trabzon"]),
    // Brazilian
    ("flamengo", &["cr flamengo", "flamengo rj"]),
    ("palmeiras", &["se palmeiras"]),
    ("corinthians", &["sc corinthians", "corinthians sp"]),
    ("sao paulo", &["são paulo", "sao paulo fc", "são paulo fc"]),
    ("santos", &["santos fc"]),
    ("fluminense", &["fluminense fc", "fluminense rj"]),
    ("gremio", &["grêmio", "gremio fb"]),
    ("internacional", &["sc internacional", "inter rs"]),
    ("athletico pr", &["athletico paranaense", "athletico-pr", "cap"]),
    ("atletico mg", &["atletico mineiro", "atlético mineiro", "atlético-mg", "atletico-mg"]),
    ("cruzeiro", &["cruzeiro mg", "cruzeiro ec"]),
    ("botafogo", &["botafogo fr", "botafogo rj"]),
    ("vasco", &["vasco da gama", "cr vasco da gama"]),
    ("ceara", &["ceará", "ceara sc"]),
    ("fortaleza", &["fortaleza ec"]),
    ("bahia", &["ec bahia"]),
    ("sport", &["sport recife", "sport club recife"]),
    ("vitoria", &["ec vitória", "ec vitoria"]),
    ("coritiba", &["coritiba fc"]),
    ("goias", &["goiás", "goias ec"]),
    ("cuiaba", &["cuiabá", "cuiaba ec"]),
    ("juventude", &["ec juventude"]),
    ("america mg", &["america mineiro", "américa mineiro", "américa-mg"]),
    ("red bull bragantino", &["bragantino", "rb bragantino"]),
    // Mexican
    ("america", &["club america", "club américa"]),
    ("guadalajara", &["chivas", "cd guadalajara"]),
    ("cruz azul", &["cruz azul fc"]),
    ("tigres", &["tigres uanl"]),
    ("monterrey", &["cf monterrey"]),
    ("toluca", &["deportivo toluca"]),
    ("pumas", &["pumas unam", "unam"]),
    ("santos laguna", &["santos lag"]),
    ("leon", &["club leon", "león"]),
    ("pachuca", &["cf pachuca"]),
    ("necaxa", &["club necaxa"]),
    ("atlas", &["atlas fc"]),
    ("mazatlan", &["mazatlán", "mazatlan fc"]),
    ("queretaro", &["querétaro", "queretaro fc"]),
    ("puebla", &["club puebla"]),
    ("tijuana", &["club tijuana", "xolos"]),
    // African
    ("al ahly", &["al-ahly", "ahly cairo"]),
    ("zamalek", &["zamalek sc"]),
    ("al hilal", &["al-hilal", "al hilal omdurman"]),
    ("esperance", &["esperance tunis", "es tunis"]),
    ("wydad", &["wydad casablanca", "wydad ac"]),
    ("raja", &["raja casablanca", "raja ca"]),
    ("mamelodi sundowns", &["sundowns"]),
    ("kaizer chiefs", &["kaizer chiefs fc"]),
    ("orlando pirates", &["orlando pirates fc"]),
    ("tp mazembe", &["tout puissant mazembe"]),
    ("simba", &["simba sc"]),
    ("young africans", &["young africans sc", "yanga"]),
];
