// Census tribal area names (ACS 5-year, 2019 vintage).

pub static TRIBAL_AREAS: &[&str] = &[
    "Acoma Pueblo and Off-Reservation Trust Land, NM",
    "Adais Caddo (state) SDTSA, LA",
    "Agua Caliente Indian Reservation and Off-Reservation Trust Land, CA",
    "Akhiok ANVSA, AK",
    "Akiachak ANVSA, AK",
    "Akiak ANVSA, AK",
    "Akutan ANVSA, AK",
    "Alabama-Coushatta Reservation and Off-Reservation Trust Land, TX",
    "Alakanuk ANVSA, AK",
    "Alatna ANVSA, AK",
    "Aleknagik ANVSA, AK",
    "Algaaciq ANVSA, AK",
    "Allakaket ANVSA, AK",
    "Allegany Reservation, NY",
    "Alturas Indian Rancheria, CA",
    "Ambler ANVSA, AK",
    "Anahola (Agricultural) Hawaiian Home Land, HI",
    "Anahola (Residential) Hawaiian Home Land, HI",
    "Anaktuvuk Pass ANVSA, AK",
    "Andreafsky ANVSA, AK",
    "Angoon ANVSA, AK",
    "Aniak ANVSA, AK",
    "Annette Island Reserve, AK",
    "Anvik ANVSA, AK",
    "Apache Choctaw (state) SDTSA, LA",
    "Arctic Village ANVSA, AK",
    "Aroostook Band of Micmac Trust Land, ME",
    "Atka ANVSA, AK",
    "Atmautluak ANVSA, AK",
    "Atqasuk ANVSA, AK",
    "Auburn Rancheria and Off-Reservation Trust Land, CA",
    "Augustine Reservation, CA",
    "Bad River Reservation, WI",
    "Barona Reservation and Off-Reservation Trust Land, CA",
    "Barrow ANVSA, AK",
    "Battle Mountain Reservation and Off-Reservation Trust Land, NV",
    "Bay Mills Reservation and Off-Reservation Trust Land, MI",
    "Beaver ANVSA, AK",
    "Beaver Creek SDTSA, SC",
    "Belkofski ANVSA, AK",
    "Benton Paiute Reservation and Off-Reservation Trust Land, CA",
    "Berry Creek Rancheria and Off-Reservation Trust Land, CA",
    "Bethel ANVSA, AK",
    "Big Bend Rancheria, CA",
    "Big Cypress Reservation, FL",
    "Big Lagoon Rancheria, CA",
    "Big Pine Reservation and Off-Reservation Trust Land, CA",
    "Big Sandy Rancheria and Off-Reservation Trust Land, CA",
    "Big Valley Rancheria, CA",
    "Bill Moore's ANVSA, AK",
    "Birch Creek ANVSA, AK",
    "Bishop Reservation, CA",
    "Blackfeet Indian Reservation and Off-Reservation Trust Land, MT",
    "Blue Lake Rancheria and Off-Reservation Trust Land, CA",
    "Bois Forte Reservation and Off-Reservation Trust Land, MN",
    "Brevig Mission ANVSA, AK",
    "Bridgeport Reservation and Off-Reservation Trust Land, CA",
    "Brighton Reservation, FL",
    "Buckland ANVSA, AK",
    "Burns Paiute Indian Colony and Off-Reservation Trust Land, OR",
    "Cabazon Reservation, CA",
    "Caddo-Wichita-Delaware OTSA, OK",
    "Cahuilla Reservation, CA",
    "Campbell Ranch, NV",
    "Campo Indian Reservation, CA",
    "Cantwell ANVSA, AK",
    "Canyon Village ANVSA, AK",
    "Capitan Grande Reservation, CA",
    "Carson Colony, NV",
    "Catawba Reservation, SC",
    "Cattaraugus Reservation, NY",
    "Cayuga Nation TDSA, NY",
    "Cedarville Rancheria and Off-Reservation Trust Land, CA",
    "Celilo Village Trust Land, OR",
    "Chalkyitsik ANVSA, AK",
    "Chefornak ANVSA, AK",
    "Chehalis Reservation and Off-Reservation Trust Land, WA",
    "Chemehuevi Reservation, CA",
    "Chenega ANVSA, AK",
    "Cher-O-Creek SDTSA, AL",
    "Cherokee OTSA, OK",
    "Cherokee Tribe of Northeast Alabama (state) SDTSA, AL",
    "Chevak ANVSA, AK",
    "Cheyenne River Reservation and Off-Reservation Trust Land, SD",
    "Cheyenne-Arapaho OTSA, OK",
    "Chickahominy (state) SDTSA, VA",
    "Chickaloon ANVSA, AK",
    "Chickasaw OTSA, OK",
    "Chicken Ranch Rancheria and Off-Reservation Trust Land, CA",
    "Chignik ANVSA, AK",
    "Chignik Lagoon ANVSA, AK",
    "Chignik Lake ANVSA, AK",
    "Chilkat ANVSA, AK",
    "Chilkoot ANVSA, AK",
    "Chistochina ANVSA, AK",
    "Chitimacha Reservation, LA",
    "Chitina ANVSA, AK",
    "Choctaw OTSA, OK",
    "Chuathbaluk ANVSA, AK",
    "Chuloonawick ANVSA, AK",
    "Circle ANVSA, AK",
    "Citizen Potawatomi Nation-Absentee Shawnee OTSA, OK",
    "Clarks Point ANVSA, AK",
    "Clifton Choctaw (state) SDTSA, LA",
    "Coconut Creek Trust Land, FL",
    "Cocopah Reservation, AZ",
    "Coeur d'Alene Reservation, ID",
    "Coharie (state) SDTSA, NC",
    "Cold Springs Rancheria, CA",
    "Colorado River Indian Reservation, AZ--CA",
    "Colusa Rancheria, CA",
    "Colville Reservation and Off-Reservation Trust Land, WA",
    "Coos, Lower Umpqua, and Siuslaw Reservation and Off-Reservation Trust Land, OR",
    "Copper Center ANVSA, AK",
    "Coquille Reservation, OR",
    "Cortina Indian Rancheria, CA",
    "Council ANVSA, AK",
    "Coushatta Reservation and Off-Reservation Trust Land, LA",
    "Cow Creek Reservation and Off-Reservation Trust Land, OR",
    "Cowlitz Reservation, WA",
    "Coyote Valley Reservation, CA",
    "Craig ANVSA, AK",
    "Creek OTSA, OK",
    "Creek/Seminole joint-use OTSA, OK",
    "Crooked Creek ANVSA, AK",
    "Crow Creek Reservation, SD",
    "Crow Reservation and Off-Reservation Trust Land, MT",
    "Deering ANVSA, AK",
    "Dillingham ANVSA, AK",
    "Dot Lake ANVSA, AK",
    "Douglas ANVSA, AK",
    "Dresslerville Colony, NV",
    "Dry Creek Rancheria and Off-Reservation Trust Land, CA",
    "Duck Valley Reservation, NV--ID",
    "Duckwater Reservation, NV",
    "Eagle ANVSA, AK",
    "East Kapolei Hawaiian Home Land, HI",
    "Eastern Cherokee Reservation, NC",
    "Eastern Chickahominy (state) SDTSA, VA",
    "Eastern Shawnee OTSA, OK",
    "Echota Cherokee (state) SDTSA, AL",
    "Eek ANVSA, AK",
    "Egegik ANVSA, AK",
    "Eklutna ANVSA, AK",
    "Ekuk ANVSA, AK",
    "Ekwok ANVSA, AK",
    "Elim ANVSA, AK",
    "Elk Valley Rancheria and Off-Reservation Trust Land, CA",
    "Elko Colony, NV",
    "Ely Reservation, NV",
    "Emmonak ANVSA, AK",
    "Enterprise Rancheria and Off-Reservation Trust Land, CA",
    "Evansville ANVSA, AK",
    "Ewiiaapaayp Reservation, CA",
    "Eyak ANVSA, AK",
    "Fallon Paiute-Shoshone Colony and Off-Reservation Trust Land, NV",
    "Fallon Paiute-Shoshone Reservation and Off-Reservation Trust Land, NV",
    "False Pass ANVSA, AK",
    "Flandreau Reservation, SD",
    "Flathead Reservation, MT",
    "Fond du Lac Reservation and Off-Reservation Trust Land, MN--WI",
    "Forest County Potawatomi Community and Off-Reservation Trust Land, WI",
    "Fort Apache Reservation, AZ",
    "Fort Belknap Reservation and Off-Reservation Trust Land, MT",
    "Fort Berthold Reservation, ND",
    "Fort Bidwell Reservation and Off-Reservation Trust Land, CA",
    "Fort Hall Reservation and Off-Reservation Trust Land, ID",
    "Fort Independence Reservation, CA",
    "Fort McDermitt Indian Reservation, NV--OR",
    "Fort McDowell Yavapai Nation Reservation, AZ",
    "Fort Mojave Reservation and Off-Reservation Trust Land, AZ--CA--NV",
    "Fort Peck Indian Reservation and Off-Reservation Trust Land, MT",
    "Fort Pierce Reservation, FL",
    "Fort Sill Apache Indian Reservation, NM",
    "Fort Yukon ANVSA, AK",
    "Fort Yuma Indian Reservation, CA--AZ",
    "Four Winds Cherokee (state) SDTSA, LA",
    "Gakona ANVSA, AK",
    "Galena ANVSA, AK",
    "Gambell ANVSA, AK",
    "Georgetown ANVSA, AK",
    "Gila River Indian Reservation, AZ",
    "Golden Hill Paugussett (state) Reservation, CT",
    "Golovin ANVSA, AK",
    "Goodnews Bay ANVSA, AK",
    "Goshute Reservation, NV--UT",
    "Grand Portage Reservation and Off-Reservation Trust Land, MN",
    "Grand Ronde Community, OR",
    "Grand Traverse Reservation and Off-Reservation Trust Land, MI",
    "Grayling ANVSA, AK",
    "Greenville Rancheria, CA",
    "Grindstone Indian Rancheria, CA",
    "Guidiville Rancheria and Off-Reservation Trust Land, CA",
    "Gulkana ANVSA, AK",
    "Haiku Hawaiian Home Land, HI",
    "Haliwa-Saponi (state) SDTSA, NC",
    "Hamilton ANVSA, AK",
    "Hanapepe Hawaiian Home Land, HI",
    "Hannahville Indian Community and Off-Reservation Trust Land, MI",
    "Hassanamisco Reservation (state), MA",
    "Havasupai Reservation, AZ",
    "Healy Lake ANVSA, AK",
    "Ho-Chunk Nation Reservation and Off-Reservation Trust Land, WI--MN",
    "Hoh Indian Reservation and Off-Reservation Trust Land, WA",
    "Hollywood Reservation, FL",
    "Holy Cross ANVSA, AK",
    "Homuula-Upper Piihonua Hawaiian Home Land, HI",
    "Honokaia Hawaiian Home Land, HI",
    "Honokowai Hawaiian Home Land, HI",
    "Honolulu Makai Hawaiian Home Land, HI",
    "Honomu Hawaiian Home Land, HI",
    "Hoolehua-Palaaau Hawaiian Home Land, HI",
    "Hoonah ANVSA, AK",
    "Hoopa Valley Reservation, CA",
    "Hooper Bay ANVSA, AK",
    "Hopi Reservation and Off-Reservation Trust Land, AZ",
    "Hopland Rancheria, CA",
    "Houlton Maliseet Reservation and Off-Reservation Trust Land, ME",
    "Hualapai Indian Reservation and Off-Reservation Trust Land, AZ",
    "Hughes ANVSA, AK",
    "Huron Potawatomi Reservation and Off-Reservation Trust Land, MI",
    "Huslia ANVSA, AK",
    "Hydaburg ANVSA, AK",
    "Igiugig ANVSA, AK",
    "Iliamna ANVSA, AK",
    "Immokalee Reservation, FL",
    "Inaja and Cosmit Reservation, CA",
    "Inalik ANVSA, AK",
    "Indian Township Reservation, ME",
    "Ione Band of Miwok TDSA, CA",
    "Iowa (KS-NE) Reservation and Off-Reservation Trust Land, KS--NE",
    "Iowa OTSA, OK",
    "Isabella Reservation, MI",
    "Isleta Pueblo, NM",
    "Ivanof Bay ANVSA, AK",
    "Jackson Rancheria, CA",
    "Jamestown S'Klallam Reservation and Off-Reservation Trust Land, WA",
    "Jamul Indian Village, CA",
    "Jemez Pueblo, NM",
    "Jena Band of Choctaw Reservation, LA",
    "Jicarilla Apache Nation Reservation and Off-Reservation Trust Land, NM",
    "Kahikinui Hawaiian Home Land, HI",
    "Kaibab Indian Reservation, AZ",
    "Kakaina-Kumuhau Hawaiian Home Land, HI",
    "Kake ANVSA, AK",
    "Kaktovik ANVSA, AK",
    "Kalaeloa Hawaiian Home Land, HI",
    "Kalamaula Hawaiian Home Land, HI",
    "Kalaupapa Hawaiian Home Land, HI",
    "Kalawahine Hawaiian Home Land, HI",
    "Kalispel Reservation and Off-Reservation Trust Land, WA",
    "Kalskag ANVSA, AK",
    "Kaltag ANVSA, AK",
    "Kamaoa-Puueo Hawaiian Home Land, HI",
    "Kamiloloa-Makakupaia Hawaiian Home Land, HI",
    "Kamoku-Kapulena Hawaiian Home Land, HI",
    "Kanehili Hawaiian Home Land, HI",
    "Kaohe-Olaa Hawaiian Home Land, HI",
    "Kapaa Hawaiian Home Land, HI",
    "Kapaakea Hawaiian Home Land, HI",
    "Kapolei Hawaiian Home Land, HI",
    "Karluk ANVSA, AK",
    "Karuk Reservation and Off-Reservation Trust Land, CA",
    "Kasaan ANVSA, AK",
    "Kasigluk ANVSA, AK",
    "Kaumana Hawaiian Home Land, HI",
    "Kaupea Hawaiian Home Land, HI",
    "Kaw OTSA, OK",
    "Kaw/Ponca joint-use OTSA, OK",
    "Kawaihae Hawaiian Home Land, HI",
    "Keahuolu Hawaiian Home Land, HI",
    "Kealakehe Hawaiian Home Land, HI",
    "Keanae-Wailua Hawaiian Home Land, HI",
    "Keaukaha Hawaiian Home Land, HI",
    "Kekaha Hawaiian Home Land, HI",
    "Kenaitze ANVSA, AK",
    "Keokea (Agricultural) Hawaiian Home Land, HI",
    "Keoniki Hawaiian Home Land, HI",
    "Ketchikan ANVSA, AK",
    "Kewalo Hawaiian Home Land, HI",
    "Kiana ANVSA, AK",
    "Kickapoo (KS) Reservation, KS",
    "Kickapoo (KS) Reservation/Sac and Fox Nation Trust Land joint-use area, KS",
    "Kickapoo (TX) Reservation and Off-Reservation Trust Land, TX",
    "Kickapoo OTSA, OK",
    "King Cove ANVSA, AK",
    "King Salmon ANVSA, AK",
    "Kiowa-Comanche-Apache-Fort Sill Apache OTSA, OK",
    "Kiowa-Comanche-Apache-Ft Sill Apache/Caddo-Wichita-Delaware joint-use OTSA, OK",
    "Kipnuk ANVSA, AK",
    "Kivalina ANVSA, AK",
    "Klamath Reservation, OR",
    "Klawock ANVSA, AK",
    "Knik ANVSA, AK",
    "Kobuk ANVSA, AK",
    "Kodiak ANVSA, AK",
    "Kokhanok ANVSA, AK",
    "Kolaoa Hawaiian Home Land, HI",
    "Kongiganak ANVSA, AK",
    "Kootenai Reservation and Off-Reservation Trust Land, ID",
    "Kotlik ANVSA, AK",
    "Kotzebue ANVSA, AK",
    "Koyuk ANVSA, AK",
    "Koyukuk ANVSA, AK",
    "Kwethluk ANVSA, AK",
    "Kwigillingok ANVSA, AK",
    "Kwinhagak ANVSA, AK",
    "L'Anse Reservation and Off-Reservation Trust Land, MI",
    "La Jolla Reservation, CA",
    "La Posta Indian Reservation, CA",
    "Lac Courte Oreilles Reservation and Off-Reservation Trust Land, WI",
    "Lac Vieux Desert Reservation, MI",
    "Lac du Flambeau Reservation, WI",
    "Laguna Pueblo and Off-Reservation Trust Land, NM",
    "Lake Minchumina ANVSA, AK",
    "Lake Traverse Reservation and Off-Reservation Trust Land, SD--ND",
    "Lalamilo Hawaiian Home Land, HI",
    "Lanai City Hawaiian Home Land, HI",
    "Larsen Bay ANVSA, AK",
    "Las Vegas Indian Colony, NV",
    "Laytonville Rancheria, CA",
    "Leech Lake Reservation and Off-Reservation Trust Land, MN",
    "Leialii Hawaiian Home Land, HI",
    "Lenape Indian Tribe of Delaware SDTSA, DE",
    "Lesnoi ANVSA, AK",
    "Levelock ANVSA, AK",
    "Likely Rancheria, CA",
    "Lime Village ANVSA, AK",
    "Little River Reservation and Off-Reservation Trust Land, MI",
    "Little Traverse Bay Reservation and Off-Reservation Trust Land, MI",
    "Lone Pine Reservation, CA",
    "Lookout Rancheria, CA",
    "Los Coyotes Reservation, CA",
    "Lovelock Indian Colony, NV",
    "Lower Brule Reservation and Off-Reservation Trust Land, SD",
    "Lower Elwha Reservation and Off-Reservation Trust Land, WA",
    "Lower Kalskag ANVSA, AK",
    "Lower Sioux Indian Community, MN",
    "Lualualei Hawaiian Home Land, HI",
    "Lumbee (state) SDTSA, NC",
    "Lummi Reservation, WA",
    "Lytton Rancheria, CA",
    "MOWA Choctaw Reservation (state), AL",
    "MaChis Lower Creek (state) SDTSA, AL",
    "Maili Hawaiian Home Land, HI",
    "Makah Indian Reservation, WA",
    "Makaha Valley Hawaiian Home Land, HI",
    "Makuu Hawaiian Home Land, HI",
    "Maluohai Hawaiian Home Land, HI",
    "Manchester-Point Arena Rancheria, CA",
    "Manley Hot Springs ANVSA, AK",
    "Manokotak ANVSA, AK",
    "Manzanita Reservation and Off-Reservation Trust Land, CA",
    "Maricopa (Ak Chin) Indian Reservation and Off-Reservation Trust Land, AZ",
    "Marshall ANVSA, AK",
    "Mary's Igloo ANVSA, AK",
    "Mashantucket Pequot Reservation, CT",
    "Mashpee Wampanoag Trust Land, MA",
    "Match-e-be-nash-she-wish Band of Pottawatomi Reservation and Off-Reservation Trust Land, MI",
    "Mattaponi Reservation (state), VA",
    "McGrath ANVSA, AK",
    "Mechoopda TDSA, CA",
    "Meherrin (state) SDTSA, NC",
    "Mekoryuk ANVSA, AK",
    "Menominee Reservation, WI",
    "Mentasta Lake ANVSA, AK",
    "Mesa Grande Reservation, CA",
    "Mescalero Reservation, NM",
    "Miami OTSA, OK",
    "Miami/Peoria joint-use OTSA, OK",
    "Miccosukee Reservation and Off-Reservation Trust Land, FL",
    "Middletown Rancheria, CA",
    "Mille Lacs Reservation and Off-Reservation Trust Land, MN",
    "Minnesota Chippewa Trust Land, MN",
    "Minto ANVSA, AK",
    "Mississippi Choctaw Reservation, MS",
    "Moapa River Indian Reservation, NV",
    "Modoc OTSA, OK",
    "Mohegan Reservation and Off-Reservation Trust Land, CT",
    "Moloaa Hawaiian Home Land, HI",
    "Montgomery Creek Rancheria, CA",
    "Mooretown Rancheria and Off-Reservation Trust Land, CA",
    "Morongo Reservation and Off-Reservation Trust Land, CA",
    "Mountain Village ANVSA, AK",
    "Muckleshoot Reservation and Off-Reservation Trust Land, WA",
    "Naknek ANVSA, AK",
    "Nambe Pueblo and Off-Reservation Trust Land, NM",
    "Nanakuli Hawaiian Home Land, HI",
    "Nanticoke Indian Tribe (state) SDTSA, DE",
    "Nanticoke Lenni Lenape (state) SDTSA, NJ",
    "Nanwalek ANVSA, AK",
    "Napaimute ANVSA, AK",
    "Napakiak ANVSA, AK",
    "Napaskiak ANVSA, AK",
    "Narragansett Reservation, RI",
    "Navajo Nation Reservation and Off-Reservation Trust Land, AZ--NM--UT",
    "Nelson Lagoon ANVSA, AK",
    "Nenana ANVSA, AK",
    "New Koliganek ANVSA, AK",
    "New Stuyahok ANVSA, AK",
    "Newhalen ANVSA, AK",
    "Newtok ANVSA, AK",
    "Nez Perce Reservation, ID",
    "Nienie Hawaiian Home Land, HI",
    "Nightmute ANVSA, AK",
    "Nikolai ANVSA, AK",
    "Nikolski ANVSA, AK",
    "Ninilchik ANVSA, AK",
    "Nisqually Reservation, WA",
    "Noatak ANVSA, AK",
    "Nome ANVSA, AK",
    "Nondalton ANVSA, AK",
    "Nooksack Reservation and Off-Reservation Trust Land, WA",
    "Noorvik ANVSA, AK",
    "North Fork Rancheria and Off-Reservation Trust Land, CA",
    "Northern Cheyenne Indian Reservation and Off-Reservation Trust Land, MT--SD",
    "Northway ANVSA, AK",
    "Northwestern Shoshone Reservation, UT",
    "Nuiqsut ANVSA, AK",
    "Nulato ANVSA, AK",
    "Nunam Iqua ANVSA, AK",
    "Nunapitchuk ANVSA, AK",
    "Occaneechi-Saponi SDTSA, NC",
    "Ohkay Owingeh, NM",
    "Ohogamiut ANVSA, AK",
    "Oil Springs Reservation, NY",
    "Old Harbor ANVSA, AK",
    "Omaha Reservation, NE--IA",
    "Oneida (WI) Reservation and Off-Reservation Trust Land, WI",
    "Oneida Nation Reservation, NY",
    "Onondaga Nation Reservation, NY",
    "Ontonagon Reservation, MI",
    "Osage Reservation, OK",
    "Oscarville ANVSA, AK",
    "Otoe-Missouria OTSA, OK",
    "Ottawa OTSA, OK",
    "Ouzinkie ANVSA, AK",
    "Paimiut ANVSA, AK",
    "Paiute (UT) Reservation, UT",
    "Pala Reservation, CA",
    "Pamunkey Reservation (state), VA",
    "Panaewa (Agricultural) Hawaiian Home Land, HI",
    "Panaewa (Residential) Hawaiian Home Land, HI",
    "Papakolea Hawaiian Home Land, HI",
    "Pascua Pueblo Yaqui Reservation and Off-Reservation Trust Land, AZ",
    "Paskenta Rancheria, CA",
    "Passamaquoddy Trust Land, ME",
    "Pauahi Hawaiian Home Land, HI",
    "Paucatuck Eastern Pequot Reservation (state), CT",
    "Paukukalo Hawaiian Home Land, HI",
    "Pauma and Yuima Reservation, CA",
    "Pawnee OTSA, OK",
    "Pearl City Hawaiian Home Land, HI",
    "Pechanga Reservation, CA",
    "Pedro Bay ANVSA, AK",
    "Pee Dee SDTSA, SC",
    "Penobscot Reservation and Off-Reservation Trust Land, ME",
    "Peoria OTSA, OK",
    "Perryville ANVSA, AK",
    "Petersburg ANVSA, AK",
    "Picayune Rancheria and Off-Reservation Trust Land, CA",
    "Picuris Pueblo, NM",
    "Piihonua Hawaiian Home Land, HI",
    "Pilot Point ANVSA, AK",
    "Pilot Station ANVSA, AK",
    "Pine Ridge Reservation, SD--NE",
    "Pinoleville Rancheria, CA",
    "Pit River Trust Land, CA",
    "Pitkas Point ANVSA, AK",
    "Platinum ANVSA, AK",
    "Pleasant Point Reservation, ME",
    "Poarch Creek Reservation and Off-Reservation Trust Land, AL--FL",
    "Point Hope ANVSA, AK",
    "Point Lay ANVSA, AK",
    "Pokagon Reservation and Off-Reservation Trust Land, MI",
    "Ponca (NE) Trust Land, NE--IA",
    "Ponca OTSA, OK",
    "Ponohawaii Hawaiian Home Land, HI",
    "Poospatuck Reservation (state), NY",
    "Port Alsworth ANVSA, AK",
    "Port Gamble Reservation and Off-Reservation Trust Land, WA",
    "Port Graham ANVSA, AK",
    "Port Heiden ANVSA, AK",
    "Port Lions ANVSA, AK",
    "Port Madison Reservation, WA",
    "Portage Creek ANVSA, AK",
    "Prairie Band of Potawatomi Nation Reservation, KS",
    "Prairie Island Indian Community and Off-Reservation Trust Land, MN",
    "Princess Kahanu Estates Hawaiian Home Land, HI",
    "Pueblo de Cochiti, NM",
    "Pueblo of Pojoaque and Off-Reservation Trust Land, NM",
    "Pulehunui Hawaiian Home Land, HI",
    "Puukapu Hawaiian Home Land, HI",
    "Puyallup Reservation and Off-Reservation Trust Land, WA",
    "Pyramid Lake Paiute Reservation, NV",
    "Quapaw OTSA, OK",
    "Quartz Valley Reservation and Off-Reservation Trust Land, CA",
    "Quileute Reservation, WA",
    "Quinault Reservation, WA",
    "Ramapough (state) SDTSA, NJ",
    "Ramona Village, CA",
    "Rampart ANVSA, AK",
    "Red Cliff Reservation and Off-Reservation Trust Land, WI",
    "Red Devil ANVSA, AK",
    "Red Lake Reservation, MN",
    "Redding Rancheria, CA",
    "Redwood Valley Rancheria, CA",
    "Reno-Sparks Indian Colony and Off-Reservation Trust Land, NV",
    "Resighini Rancheria, CA",
    "Rincon Reservation and Off-Reservation Trust Land, CA",
    "Roaring Creek Rancheria, CA",
    "Robinson Rancheria and Off-Reservation Trust Land, CA",
    "Rocky Boy's Reservation and Off-Reservation Trust Land, MT",
    "Rohnerville Rancheria, CA",
    "Rosebud Indian Reservation and Off-Reservation Trust Land, SD",
    "Round Valley Reservation and Off-Reservation Trust Land, CA",
    "Ruby ANVSA, AK",
    "Rumsey Indian Rancheria, CA",
    "Russian Mission ANVSA, AK",
    "Sac and Fox Nation Reservation and Off-Reservation Trust Land, NE--KS",
    "Sac and Fox OTSA, OK",
    "Sac and Fox/Meskwaki Settlement and Off-Reservation Trust Land, IA",
    "Saint Croix Reservation and Off-Reservation Trust Land, WI",
    "Saint Regis Mohawk Reservation, NY",
    "Salamatof ANVSA, AK",
    "Salt River Reservation, AZ",
    "Samish TDSA, WA",
    "San Carlos Reservation, AZ",
    "San Felipe Pueblo, NM",
    "San Felipe Pueblo/Santa Ana Pueblo joint-use area, NM",
    "San Felipe Pueblo/Santo Domingo Pueblo joint-use area, NM",
    "San Ildefonso Pueblo and Off-Reservation Trust Land, NM",
    "San Manuel Reservation and Off-Reservation Trust Land, CA",
    "San Pasqual Reservation and Off-Reservation Trust Land, CA",
    "Sand Point ANVSA, AK",
    "Sandia Pueblo, NM",
    "Santa Ana Pueblo, NM",
    "Santa Clara Pueblo and Off-Reservation Trust Land, NM",
    "Santa Rosa Rancheria, CA",
    "Santa Rosa Reservation, CA",
    "Santa Ynez Reservation, CA",
    "Santa Ysabel Reservation, CA",
    "Santee Reservation, NE",
    "Santee SDTSA, SC",
    "Santo Domingo Pueblo, NM",
    "Sappony SDTSA, NC",
    "Sauk-Suiattle Reservation, WA",
    "Sault Sainte Marie Reservation and Off-Reservation Trust Land, MI",
    "Savoonga ANVSA, AK",
    "Saxman ANVSA, AK",
    "Scammon Bay ANVSA, AK",
    "Schaghticoke Reservation (state), CT",
    "Selawik ANVSA, AK",
    "Seldovia ANVSA, AK",
    "Seminole (FL) Trust Land, FL",
    "Seminole OTSA, OK",
    "Seneca-Cayuga OTSA, OK",
    "Shageluk ANVSA, AK",
    "Shakopee Mdewakanton Sioux Community and Off-Reservation Trust Land, MN",
    "Shaktoolik ANVSA, AK",
    "Sherwood Valley Rancheria and Off-Reservation Trust Land, CA",
    "Shingle Springs Rancheria and Off-Reservation Trust Land, CA",
    "Shinnecock Reservation (state), NY",
    "Shishmaref ANVSA, AK",
    "Shoalwater Bay Indian Reservation and Off-Reservation Trust Land, WA",
    "Shungnak ANVSA, AK",
    "Siletz Reservation and Off-Reservation Trust Land, OR",
    "Sitka ANVSA, AK",
    "Skagway ANVSA, AK",
    "Skokomish Reservation and Off-Reservation Trust Land, WA",
    "Skull Valley Reservation, UT",
    "Sleetmute ANVSA, AK",
    "Smith River Reservation and Off-Reservation Trust Land, CA",
    "Snoqualmie Reservation, WA",
    "Soboba Reservation and Off-Reservation Trust Land, CA",
    "Sokaogon Chippewa Community, WI",
    "Solomon ANVSA, AK",
    "South Fork Reservation and Off-Reservation Trust Land, NV",
    "South Maui Hawaiian Home Land, HI",
    "South Naknek ANVSA, AK",
    "Southern Ute Reservation, CO",
    "Spirit Lake Reservation, ND",
    "Spokane Reservation and Off-Reservation Trust Land, WA",
    "Squaxin Island Reservation and Off-Reservation Trust Land, WA",
    "St. George ANVSA, AK",
    "St. Michael ANVSA, AK",
    "St. Paul ANVSA, AK",
    "Standing Rock Reservation, SD--ND",
    "Star Muskogee Creek (state) SDTSA, AL",
    "Stebbins ANVSA, AK",
    "Stevens Village ANVSA, AK",
    "Stewart Community, NV",
    "Stewarts Point Rancheria and Off-Reservation Trust Land, CA",
    "Stillaguamish Reservation and Off-Reservation Trust Land, WA",
    "Stockbridge Munsee Community and Off-Reservation Trust Land, WI",
    "Stony River ANVSA, AK",
    "Sulphur Bank Rancheria, CA",
    "Summit Lake Reservation and Off-Reservation Trust Land, NV",
    "Susanville Indian Rancheria and Off-Reservation Trust Land, CA",
    "Swinomish Reservation and Off-Reservation Trust Land, WA",
    "Sycuan Reservation and Off-Reservation Trust Land, CA",
    "Table Bluff Reservation, CA",
    "Table Mountain Rancheria, CA",
    "Takotna ANVSA, AK",
    "Tama Reservation (state), GA",
    "Tampa Reservation, FL",
    "Tanacross ANVSA, AK",
    "Tanana ANVSA, AK",
    "Taos Pueblo and Off-Reservation Trust Land, NM",
    "Tatitlek ANVSA, AK",
    "Tazlina ANVSA, AK",
    "Telida ANVSA, AK",
    "Teller ANVSA, AK",
    "Tesuque Pueblo and Off-Reservation Trust Land, NM",
    "Tetlin ANVSA, AK",
    "Timbi-Sha Shoshone Reservation and Off-Reservation Trust Land, CA--NV",
    "Togiak ANVSA, AK",
    "Tohono O'odham Nation Reservation and Off-Reservation Trust Land, AZ",
    "Toksook Bay ANVSA, AK",
    "Tonawanda Reservation, NY",
    "Tonkawa OTSA, OK",
    "Tonto Apache Reservation and Off-Reservation Trust Land, AZ",
    "Torres-Martinez Reservation, CA",
    "Trinidad Rancheria and Off-Reservation Trust Land, CA",
    "Tulalip Reservation and Off-Reservation Trust Land, WA",
    "Tule River Reservation and Off-Reservation Trust Land, CA",
    "Tuluksak ANVSA, AK",
    "Tunica-Biloxi Reservation and Off-Reservation Trust Land, LA",
    "Tuntutuliak ANVSA, AK",
    "Tununak ANVSA, AK",
    "Tuolumne Rancheria, CA",
    "Turtle Mountain Reservation and Off-Reservation Trust Land, MT--ND--SD",
    "Tuscarora Nation Reservation, NY",
    "Twenty-Nine Palms Reservation and Off-Reservation Trust Land, CA",
    "Twin Hills ANVSA, AK",
    "Tyonek ANVSA, AK",
    "Ualapue Hawaiian Home Land, HI",
    "Ugashik ANVSA, AK",
    "Uintah and Ouray Reservation and Off-Reservation Trust Land, UT",
    "Umatilla Reservation and Off-Reservation Trust Land, OR",
    "Unalakleet ANVSA, AK",
    "Unalaska ANVSA, AK",
    "United Cherokee Ani-Yun-Wiya Nation SDTSA, AL",
    "United Houma Nation (state) SDTSA, LA",
    "Upolu Hawaiian Home Land, HI",
    "Upper Lake Rancheria, CA",
    "Upper Sioux Community and Off-Reservation Trust Land, MN",
    "Upper Skagit Reservation and Off-Reservation Trust Land, WA",
    "Upper South Carolina Pee Dee SDTSA, SC",
    "Ute Mountain Reservation and Off-Reservation Trust Land, CO--NM--UT",
    "Venetie ANVSA, AK",
    "Viejas Reservation and Off-Reservation Trust Land, CA",
    "Waccamaw SDTSA, SC",
    "Waccamaw Siouan (state) SDTSA, NC",
    "Waiahole Hawaiian Home Land, HI",
    "Waiakea Hawaiian Home Land, HI",
    "Waianae Hawaiian Home Land, HI",
    "Waianae Kai Hawaiian Home Land, HI",
    "Waiehu Hawaiian Home Land, HI",
    "Waiku-Hana Hawaiian Home Land, HI",
    "Wailau Hawaiian Home Land, HI",
    "Wailua Hawaiian Home Land, HI",
    "Waimanalo Hawaiian Home Land, HI",
    "Waimanu Hawaiian Home Land, HI",
    "Waimea Hawaiian Home Land, HI",
    "Wainwright ANVSA, AK",
    "Waiohinu Hawaiian Home Land, HI",
    "Waiohuli (Residential) Hawaiian Home Land, HI",
    "Wales ANVSA, AK",
    "Walker River Reservation, NV",
    "Wampanoag-Aquinnah Trust Land, MA",
    "Warm Springs Reservation and Off-Reservation Trust Land, OR",
    "Washoe Ranches Trust Land, NV--CA",
    "Wassamasaw SDTSA, SC",
    "Wells Colony, NV",
    "White Earth Reservation and Off-Reservation Trust Land, MN",
    "White Mountain ANVSA, AK",
    "Wind River Reservation and Off-Reservation Trust Land, WY",
    "Winnebago Reservation and Off-Reservation Trust Land, NE--IA",
    "Winnemucca Indian Colony, NV",
    "Woodfords Community, CA",
    "Wrangell ANVSA, AK",
    "Wyandotte OTSA, OK",
    "XL Ranch Rancheria, CA",
    "Yakama Nation Reservation and Off-Reservation Trust Land, WA",
    "Yakutat ANVSA, AK",
    "Yankton Reservation, SD",
    "Yavapai-Apache Nation Reservation and Off-Reservation Trust Land, AZ",
    "Yavapai-Prescott Reservation, AZ",
    "Yerington Colony, NV",
    "Yomba Reservation, NV",
    "Ysleta del Sur Pueblo and Off-Reservation Trust Land, TX",
    "Yurok Reservation, CA",
    "Zia Pueblo and Off-Reservation Trust Land, NM",
    "Zuni Reservation and Off-Reservation Trust Land, NM--AZ",
];
